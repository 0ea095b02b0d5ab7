//! Per-tree identity map: at most one live navigator per concrete URI.

use std::cell::RefCell;
use std::collections::HashMap;
use std::rc::{Rc, Weak};

use crate::core::navigator::proxy::Inner;

/// URI-keyed cache of non-owning handles to every concrete navigator in one
/// navigation tree.
///
/// The map holds [`Weak`] handles only, so it never keeps a navigator
/// alive. Once every external handle to an entry is dropped the entry is
/// dead; the next lookup for that URI prunes it and the caller builds a
/// fresh navigator (any unread state accumulated on the old one is lost —
/// accepted behavior, not a bug). Templated navigators are never
/// registered: an unexpanded template is not a single addressable resource.
pub(crate) struct IdentityMap {
    entries: RefCell<HashMap<String, Weak<Inner>>>,
}

impl IdentityMap {
    pub(crate) fn new() -> Rc<Self> {
        Rc::new(IdentityMap {
            entries: RefCell::new(HashMap::new()),
        })
    }

    /// Return the live navigator for `uri`, pruning the entry if it died.
    pub(crate) fn lookup(&self, uri: &str) -> Option<Rc<Inner>> {
        let mut entries = self.entries.borrow_mut();
        match entries.get(uri).map(Weak::upgrade) {
            Some(Some(inner)) => Some(inner),
            Some(None) => {
                entries.remove(uri);
                None
            }
            None => None,
        }
    }

    pub(crate) fn insert(&self, uri: &str, inner: &Rc<Inner>) {
        self.entries
            .borrow_mut()
            .insert(uri.to_owned(), Rc::downgrade(inner));
    }
}
