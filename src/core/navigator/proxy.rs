//! The resource proxy at the center of the navigation model.
//!
//! A [`HalNavigator`] is a cheap-clone handle over one node of a navigation
//! tree. It starts out knowing only an address (or a URI template) and
//! fetches lazily: the first read of `links()` or `state()` performs the
//! GET, later reads hit the cached snapshot. All navigators derived from
//! one root share a single identity map, so within a tree there is at most
//! one live navigator per concrete URI.

use std::cell::{Cell, RefCell};
use std::collections::{BTreeMap, BTreeSet};
use std::fmt;
use std::rc::Rc;

use serde_json::{Map, Value};
use url::Url;

use crate::core::client::NativeTransport;
use crate::core::error::{HalError, Result};
use crate::core::navigator::address::{self, AddressElem};
use crate::core::navigator::collection::LinkCollection;
use crate::core::navigator::identity::IdentityMap;
use crate::core::navigator::registry::LinkRegistry;
use crate::core::template;
use crate::core::traits::HalTransport;
use crate::core::types::{HalDocument, LinkDescriptor};
use crate::core::utils::{canonical_text, fix_scheme, namify};

/// Media type assumed for resources that do not declare one.
pub const HAL_MEDIA_TYPE: &str = "application/hal+json";

/// The forward relation used by [`HalNavigator::pages`].
const NEXT_REL: &str = "next";

/// Options for constructing a root navigator.
///
/// ```no_run
/// use halnav::{HalNavigator, NavigatorConfig};
///
/// let api = HalNavigator::with_config(
///     "api.example.com",
///     NavigatorConfig {
///         default_curie: Some("ex".into()),
///         ..Default::default()
///     },
/// ).unwrap();
/// # let _ = api;
/// ```
#[derive(Default)]
pub struct NavigatorConfig {
    /// Display name; derived from the address when absent.
    pub name: Option<String>,
    /// Curie prefix implied for bare, non-standard relation lookups.
    pub default_curie: Option<String>,
    /// Transport collaborator; [`NativeTransport`] when absent.
    pub transport: Option<Rc<dyn HalTransport>>,
}

pub(crate) struct Inner {
    root: String,
    /// Concrete absolute address. Mutually exclusive with `template_uri`.
    uri: Option<String>,
    template_uri: Option<String>,
    /// Template arguments committed by earlier partial expansions.
    bound_args: BTreeMap<String, String>,
    name: String,
    rel: Option<String>,
    media_type: String,
    profile: Option<String>,
    templated: bool,
    /// Unbound template variables, for introspection.
    parameters: BTreeSet<String>,
    /// Address of the resource whose fetch declared this navigator;
    /// relative hrefs and expanded templates resolve against it.
    base: String,
    default_curie: Option<String>,
    title: RefCell<Option<String>>,
    fetched: Cell<bool>,
    status: RefCell<Option<(u16, String)>>,
    state: RefCell<Rc<Map<String, Value>>>,
    links: RefCell<Rc<LinkRegistry>>,
    id_map: Rc<IdentityMap>,
    transport: Rc<dyn HalTransport>,
}

/// Lazy proxy for one resource (or one unexpanded URI template) in a
/// navigation tree.
#[derive(Clone)]
pub struct HalNavigator {
    inner: Rc<Inner>,
}

impl HalNavigator {
    /// Root navigator with the default transport and options.
    ///
    /// The address may omit its scheme (`http` is assumed); schemes other
    /// than `http`/`https` are rejected.
    pub fn new(root: &str) -> Result<Self> {
        Self::with_config(root, NavigatorConfig::default())
    }

    /// Root navigator with explicit options.
    pub fn with_config(root: &str, config: NavigatorConfig) -> Result<Self> {
        let root = fix_scheme(root)?;
        Url::parse(&root)?;
        let transport = config
            .transport
            .unwrap_or_else(|| Rc::new(NativeTransport::new()));
        let name = config.name.unwrap_or_else(|| namify(&root));
        let id_map = IdentityMap::new();
        let inner = Rc::new(Inner {
            root: root.clone(),
            uri: Some(root.clone()),
            template_uri: None,
            bound_args: BTreeMap::new(),
            name,
            rel: None,
            media_type: HAL_MEDIA_TYPE.to_owned(),
            profile: None,
            templated: false,
            parameters: BTreeSet::new(),
            base: root.clone(),
            default_curie: config.default_curie,
            title: RefCell::new(None),
            fetched: Cell::new(false),
            status: RefCell::new(None),
            state: RefCell::new(Rc::new(Map::new())),
            links: RefCell::new(Rc::new(LinkRegistry::empty())),
            id_map: id_map.clone(),
            transport,
        });
        id_map.insert(&root, &inner);
        Ok(HalNavigator { inner })
    }

    /// Root navigator over a caller-supplied transport.
    pub fn with_transport(root: &str, transport: Rc<dyn HalTransport>) -> Result<Self> {
        Self::with_config(
            root,
            NavigatorConfig {
                transport: Some(transport),
                ..Default::default()
            },
        )
    }

    // ---- introspection ----

    pub fn root(&self) -> &str {
        &self.inner.root
    }

    /// Concrete absolute address; `None` while templated.
    pub fn uri(&self) -> Option<&str> {
        self.inner.uri.as_deref()
    }

    pub fn template_uri(&self) -> Option<&str> {
        self.inner.template_uri.as_deref()
    }

    /// Unbound template variable names; empty for concrete navigators.
    pub fn variables(&self) -> &BTreeSet<String> {
        &self.inner.parameters
    }

    pub fn name(&self) -> &str {
        &self.inner.name
    }

    pub fn title(&self) -> Option<String> {
        self.inner.title.borrow().clone()
    }

    /// Relation name of the link that produced this navigator.
    pub fn relation(&self) -> Option<&str> {
        self.inner.rel.as_deref()
    }

    pub fn media_type(&self) -> &str {
        &self.inner.media_type
    }

    pub fn profile(&self) -> Option<&str> {
        self.inner.profile.as_deref()
    }

    pub fn is_templated(&self) -> bool {
        self.inner.templated
    }

    pub fn is_fetched(&self) -> bool {
        self.inner.fetched.get()
    }

    /// Status and reason of the last fetch. Never triggers a fetch.
    pub fn status(&self) -> Option<(u16, String)> {
        self.inner.status.borrow().clone()
    }

    /// Instance identity: whether two handles share one underlying proxy.
    pub fn ptr_eq(a: &Self, b: &Self) -> bool {
        Rc::ptr_eq(&a.inner, &b.inner)
    }

    // ---- fetching ----

    /// GET this resource and replace the link/state snapshot.
    ///
    /// Fails with [`HalError::AmbiguousNavigation`] on a templated
    /// navigator: an unexpanded template has no single address to request.
    /// Non-2xx responses are recorded in [`status`](Self::status) and their
    /// bodies parsed like any other; only transport failures and malformed
    /// JSON are errors.
    pub fn fetch(&self) -> Result<()> {
        let uri = match (&self.inner.uri, self.inner.templated) {
            (Some(uri), false) => uri.clone(),
            _ => {
                let context = self
                    .inner
                    .template_uri
                    .clone()
                    .unwrap_or_else(|| self.inner.name.clone());
                return Err(HalError::AmbiguousNavigation(context));
            }
        };
        tracing::debug!(uri = %uri, "fetching resource");
        let response = self.inner.transport.get(&uri)?;
        if !response.is_success() {
            tracing::warn!(uri = %uri, status = response.status, "non-success response");
        }
        *self.inner.status.borrow_mut() = Some((response.status, response.reason.clone()));

        let body: Value = serde_json::from_slice(&response.body)?;
        let HalDocument {
            links,
            self_title,
            embedded_rels,
            state,
        } = HalDocument::from_value(body)?;
        if !embedded_rels.is_empty() {
            // Embedded sub-resources are recognized but not traversed.
            tracing::debug!(uri = %uri, rels = ?embedded_rels, "dropping embedded section");
        }

        let mut registry = LinkRegistry::new(uri.clone(), self.inner.default_curie.clone());
        for (rel, raw_links) in links {
            let mut collection = LinkCollection::new(rel.clone(), uri.clone());
            for raw in raw_links {
                let child = self.derive_child(&rel, &raw.descriptor)?;
                collection.push_with(child, &raw.properties);
            }
            registry.insert(rel, collection);
        }

        if let Some(title) = self_title {
            *self.inner.title.borrow_mut() = Some(title);
        }
        // Commit: state and links are replaced together, never partially.
        *self.inner.state.borrow_mut() = Rc::new(state);
        *self.inner.links.borrow_mut() = Rc::new(registry);
        self.inner.fetched.set(true);
        Ok(())
    }

    fn ensure_fetched(&self) -> Result<()> {
        if self.inner.fetched.get() {
            return Ok(());
        }
        self.fetch()
    }

    /// Links of this resource, fetching on first access.
    pub fn links(&self) -> Result<Rc<LinkRegistry>> {
        self.ensure_fetched()?;
        Ok(self.inner.links.borrow().clone())
    }

    /// Independent copy of the resource state, fetching on first access.
    ///
    /// Mutating the returned map never affects the navigator.
    pub fn state(&self) -> Result<Map<String, Value>> {
        self.ensure_fetched()?;
        let state = self.inner.state.borrow();
        Ok(Map::clone(&state))
    }

    // ---- traversal ----

    /// Follow one link relation, fetching this resource if necessary.
    ///
    /// A templated result is returned as a detached copy so that expanding
    /// it cannot corrupt the instance shared through the link registry.
    pub fn follow(&self, rel: &str) -> Result<HalNavigator> {
        let next = self.links()?.get(rel)?;
        if next.is_templated() {
            Ok(next.detached())
        } else {
            Ok(next)
        }
    }

    /// Resolve a chained address expression against this navigator.
    ///
    /// Relation hops are dereferenced in order, each one fetching the
    /// resource it lands on at most once; template bindings and the
    /// keep-templated marker then apply to the final navigator. Malformed
    /// expressions fail before any network access.
    ///
    /// ```no_run
    /// use halnav::{AddressElem, HalNavigator};
    ///
    /// let api = HalNavigator::new("http://example.com/api/")?;
    /// let order = api.select(&[
    ///     AddressElem::rel("ex:orders"),
    ///     AddressElem::bind("id", 42),
    /// ])?;
    /// # let _ = order;
    /// # Ok::<(), halnav::HalError>(())
    /// ```
    pub fn select(&self, elems: &[AddressElem]) -> Result<HalNavigator> {
        let parsed = address::parse(elems)?;
        let mut current = self.clone();
        for rel in &parsed.rels {
            current = current.follow(rel)?;
        }
        if parsed.wants_expansion() {
            current = current.expand_with(&parsed.args, parsed.keep_templated)?;
        }
        Ok(current)
    }

    // ---- template expansion ----

    /// Expand this template into a concrete navigator.
    ///
    /// Arguments are canonicalized to text before substitution (so a
    /// numeric `0` expands as `"0"`, not as an empty value). Arguments
    /// bound by an earlier partial expansion take precedence over newly
    /// supplied values for the same variable. The result resolves through
    /// the identity map like any other concrete navigator.
    pub fn expand<I, K, V>(&self, args: I) -> Result<HalNavigator>
    where
        I: IntoIterator<Item = (K, V)>,
        K: Into<String>,
        V: Into<Value>,
    {
        self.expand_with(&collect_args(args), false)
    }

    /// Expand while keeping the result templated for further expansion.
    ///
    /// The supplied arguments are recorded as bound parameters; the result
    /// is never registered in the identity map.
    pub fn expand_partial<I, K, V>(&self, args: I) -> Result<HalNavigator>
    where
        I: IntoIterator<Item = (K, V)>,
        K: Into<String>,
        V: Into<Value>,
    {
        self.expand_with(&collect_args(args), true)
    }

    fn expand_with(&self, args: &Map<String, Value>, keep_templated: bool) -> Result<HalNavigator> {
        let template_uri = match (&self.inner.template_uri, self.inner.templated) {
            (Some(template_uri), true) => template_uri.clone(),
            _ => {
                let context = self
                    .inner
                    .uri
                    .clone()
                    .unwrap_or_else(|| self.inner.name.clone());
                return Err(HalError::NotExpandable(context));
            }
        };

        let mut merged: BTreeMap<String, String> = args
            .iter()
            .map(|(key, value)| (key.clone(), canonical_text(value)))
            .collect();
        // Previously committed bindings win over newly supplied ones.
        for (key, value) in &self.inner.bound_args {
            merged.insert(key.clone(), value.clone());
        }

        if keep_templated {
            return Ok(self.derive_copy().templated(template_uri, merged).build());
        }
        let expanded = template::expand(&template_uri, &merged)?;
        let absolute = resolve_uri(&self.inner.base, &expanded)?;
        Ok(self.derive_copy().concrete(absolute).build())
    }

    // ---- pagination ----

    /// The resource one `next` hop away.
    ///
    /// Fails with [`HalError::EndOfSequence`] when this resource declares
    /// no `next` link.
    pub fn next_page(&self) -> Result<HalNavigator> {
        match self.follow(NEXT_REL) {
            Ok(next) => Ok(next),
            Err(HalError::RelationNotFound { .. }) => Err(HalError::EndOfSequence),
            Err(other) => Err(other),
        }
    }

    /// Iterate this resource and everything reachable over `next` links.
    ///
    /// The sequence starts with this navigator and ends when a page
    /// declares no `next` relation; every yielded page has been fetched.
    /// Calling `pages()` again restarts from this navigator.
    pub fn pages(&self) -> Pages {
        Pages {
            current: Some(self.clone()),
        }
    }

    // ---- derivation ----

    fn derive_child(&self, rel: &str, descriptor: &LinkDescriptor) -> Result<HalNavigator> {
        let builder = self.derive_from_link(rel, descriptor);
        if descriptor.templated {
            Ok(builder
                .templated(descriptor.href.clone(), BTreeMap::new())
                .build())
        } else {
            let absolute = resolve_uri(
                self.inner.uri.as_deref().unwrap_or(&self.inner.base),
                &descriptor.href,
            )?;
            Ok(builder.concrete(absolute).build())
        }
    }

    /// Unregistered copy of a templated navigator, safe to expand further.
    fn detached(&self) -> HalNavigator {
        let template_uri = self
            .inner
            .template_uri
            .clone()
            .unwrap_or_else(|| self.inner.base.clone());
        self.derive_copy()
            .templated(template_uri, self.inner.bound_args.clone())
            .build()
    }

    fn derive_from_link(&self, rel: &str, descriptor: &LinkDescriptor) -> NavigatorBuilder {
        NavigatorBuilder {
            parent: self.inner.clone(),
            uri: None,
            template_uri: None,
            bound_args: BTreeMap::new(),
            templated: false,
            name: None,
            rel: Some(rel.to_owned()),
            title: descriptor.title.clone(),
            media_type: descriptor.media_type.clone(),
            profile: descriptor.profile.clone(),
        }
    }

    fn derive_copy(&self) -> NavigatorBuilder {
        NavigatorBuilder {
            parent: self.inner.clone(),
            uri: None,
            template_uri: None,
            bound_args: BTreeMap::new(),
            templated: false,
            name: Some(self.inner.name.clone()),
            rel: self.inner.rel.clone(),
            title: self.inner.title.borrow().clone(),
            media_type: Some(self.inner.media_type.clone()),
            profile: self.inner.profile.clone(),
        }
    }
}

/// Two navigators are equal when their addresses and display names match;
/// comparison never touches the network.
impl PartialEq for HalNavigator {
    fn eq(&self, other: &Self) -> bool {
        self.inner.uri == other.inner.uri && self.inner.name == other.inner.name
    }
}

impl Eq for HalNavigator {}

impl fmt::Debug for HalNavigator {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "HalNavigator('{}')", self.inner.name)
    }
}

/// Iterator over a chain of `next` links. See [`HalNavigator::pages`].
pub struct Pages {
    current: Option<HalNavigator>,
}

impl Iterator for Pages {
    type Item = Result<HalNavigator>;

    fn next(&mut self) -> Option<Self::Item> {
        let current = self.current.take()?;
        match current.next_page() {
            Ok(next) => {
                self.current = Some(next);
                Some(Ok(current))
            }
            Err(HalError::EndOfSequence) => Some(Ok(current)),
            Err(other) => Some(Err(other)),
        }
    }
}

/// Pending-mutation builder used while deriving one navigator from another.
///
/// Inherits tree-wide context (root, identity map, transport, default
/// curie) from its parent and consults the identity map before
/// materializing: deriving an address that is already live in the tree
/// returns the existing instance instead.
pub(crate) struct NavigatorBuilder {
    parent: Rc<Inner>,
    uri: Option<String>,
    template_uri: Option<String>,
    bound_args: BTreeMap<String, String>,
    templated: bool,
    name: Option<String>,
    rel: Option<String>,
    title: Option<String>,
    media_type: Option<String>,
    profile: Option<String>,
}

impl NavigatorBuilder {
    fn concrete(mut self, uri: String) -> Self {
        self.uri = Some(uri);
        self.templated = false;
        self.template_uri = None;
        self.bound_args.clear();
        self
    }

    fn templated(mut self, template_uri: String, bound_args: BTreeMap<String, String>) -> Self {
        self.uri = None;
        self.templated = true;
        self.template_uri = Some(template_uri);
        self.bound_args = bound_args;
        self
    }

    fn build(self) -> HalNavigator {
        if let (Some(uri), false) = (&self.uri, self.templated) {
            if let Some(existing) = self.parent.id_map.lookup(uri) {
                return HalNavigator { inner: existing };
            }
        }
        let name = self.name.unwrap_or_else(|| {
            namify(
                self.uri
                    .as_deref()
                    .or(self.template_uri.as_deref())
                    .unwrap_or(&self.parent.root),
            )
        });
        let parameters: BTreeSet<String> = match &self.template_uri {
            Some(template_uri) if self.templated => template::variables(template_uri)
                .into_iter()
                .filter(|var| !self.bound_args.contains_key(var))
                .collect(),
            _ => BTreeSet::new(),
        };
        let base = self
            .parent
            .uri
            .clone()
            .unwrap_or_else(|| self.parent.base.clone());
        let inner = Rc::new(Inner {
            root: self.parent.root.clone(),
            uri: self.uri,
            template_uri: self.template_uri,
            bound_args: self.bound_args,
            name,
            rel: self.rel,
            media_type: self
                .media_type
                .unwrap_or_else(|| HAL_MEDIA_TYPE.to_owned()),
            profile: self.profile,
            templated: self.templated,
            parameters,
            base,
            default_curie: self.parent.default_curie.clone(),
            title: RefCell::new(self.title),
            fetched: Cell::new(false),
            status: RefCell::new(None),
            state: RefCell::new(Rc::new(Map::new())),
            links: RefCell::new(Rc::new(LinkRegistry::empty())),
            id_map: self.parent.id_map.clone(),
            transport: self.parent.transport.clone(),
        });
        if let Some(uri) = &inner.uri {
            inner.id_map.insert(uri, &inner);
        }
        HalNavigator { inner }
    }
}

fn collect_args<I, K, V>(args: I) -> Map<String, Value>
where
    I: IntoIterator<Item = (K, V)>,
    K: Into<String>,
    V: Into<Value>,
{
    args.into_iter()
        .map(|(key, value)| (key.into(), value.into()))
        .collect()
}

fn resolve_uri(base: &str, reference: &str) -> Result<String> {
    let base = Url::parse(base)?;
    Ok(base.join(reference)?.to_string())
}
