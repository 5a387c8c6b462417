//! XPath queries over parsed XML documents.
//!
//! Thin helpers over [`sxd_xpath`] for the three common questions asked of a
//! document: which nodes match, which node matches first, and what text a
//! match holds. Each call compiles the expression with a fresh
//! [`Factory`] and evaluates it in a fresh [`Context`].
//!
//! Prefixed names only resolve through [`NamespaceBindings`] passed to the
//! `*_ns` variants, which also bind the reserved `xml` prefix. The plain
//! variants install no namespaces at all.
//!
//! ```
//! use stagehand_libs::xpath::{self, NamespaceBindings};
//!
//! let package = sxd_document::parser::parse(
//!     r#"<a xmlns:ns="urn:x"><ns:b>hello</ns:b></a>"#,
//! ).unwrap();
//! let document = package.as_document();
//!
//! let ns = NamespaceBindings::new().bind("ns", "urn:x");
//! assert_eq!(xpath::select_text_ns("//ns:b", document.root(), &ns).unwrap(), "hello");
//! assert!(xpath::select_nodes("//ns:b", document.root()).is_err());
//! ```

use std::collections::HashMap;
use std::ops::Index;

use sxd_xpath::nodeset::Node;
use sxd_xpath::{Context, Factory, Value};
use thiserror::Error;

use stagehand_core::StagehandError;

/// Namespace URI permanently bound to the `xml` prefix.
pub const XML_NAMESPACE: &str = "http://www.w3.org/XML/1998/namespace";

/// Errors raised while compiling or evaluating an XPath expression.
#[derive(Error, Debug)]
pub enum XPathError {
    /// The expression could not be compiled.
    #[error("Invalid XPath expression '{expression}': {source}")]
    Compile {
        /// The offending expression.
        expression: String,
        /// The engine's diagnostic.
        #[source]
        source: sxd_xpath::Error,
    },

    /// The expression is empty.
    #[error("Empty XPath expression")]
    Empty {
        /// The offending expression.
        expression: String,
    },

    /// The expression uses a namespace prefix with no binding.
    #[error("XPath expression '{expression}' uses unbound namespace prefix '{prefix}'")]
    UnboundPrefix {
        /// The offending expression.
        expression: String,
        /// The first prefix without a binding.
        prefix: String,
    },

    /// The expression compiled but failed during evaluation.
    #[error("Failed to evaluate XPath expression '{expression}': {source}")]
    Evaluate {
        /// The offending expression.
        expression: String,
        /// The engine's diagnostic.
        #[source]
        source: sxd_xpath::ExecutionError,
    },

    /// A node query was made with an expression that yields a scalar.
    #[error("XPath expression '{expression}' evaluated to a {found}, not a node-set")]
    NotANodeset {
        /// The offending expression.
        expression: String,
        /// The kind of value produced instead.
        found: &'static str,
    },
}

impl From<XPathError> for StagehandError {
    fn from(err: XPathError) -> Self {
        Self::QueryEvaluation(err.to_string())
    }
}

/// A convenience type alias for `Result<T, XPathError>`.
pub type XPathResult<T> = Result<T, XPathError>;

/// Prefix to namespace-URI bindings used while evaluating an expression.
///
/// Each prefix maps to exactly one URI; binding a prefix again replaces the
/// previous URI.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct NamespaceBindings {
    bindings: HashMap<String, String>,
}

impl NamespaceBindings {
    /// Creates an empty set of bindings.
    pub fn new() -> Self {
        Self::default()
    }

    /// Adds a binding and returns `self` for chaining.
    #[must_use]
    pub fn bind(mut self, prefix: impl Into<String>, uri: impl Into<String>) -> Self {
        self.insert(prefix, uri);
        self
    }

    /// Adds or replaces a binding.
    pub fn insert(&mut self, prefix: impl Into<String>, uri: impl Into<String>) {
        self.bindings.insert(prefix.into(), uri.into());
    }

    /// Returns the URI bound to `prefix`.
    pub fn get(&self, prefix: &str) -> Option<&str> {
        self.bindings.get(prefix).map(String::as_str)
    }

    /// Returns the number of bindings.
    pub fn len(&self) -> usize {
        self.bindings.len()
    }

    /// Returns `true` if there are no bindings.
    pub fn is_empty(&self) -> bool {
        self.bindings.is_empty()
    }

    /// Iterates over `(prefix, uri)` pairs in no particular order.
    pub fn iter(&self) -> impl Iterator<Item = (&str, &str)> {
        self.bindings.iter().map(|(p, u)| (p.as_str(), u.as_str()))
    }
}

impl<P: Into<String>, U: Into<String>> FromIterator<(P, U)> for NamespaceBindings {
    fn from_iter<I: IntoIterator<Item = (P, U)>>(iter: I) -> Self {
        Self {
            bindings: iter
                .into_iter()
                .map(|(p, u)| (p.into(), u.into()))
                .collect(),
        }
    }
}

impl From<HashMap<String, String>> for NamespaceBindings {
    fn from(bindings: HashMap<String, String>) -> Self {
        Self { bindings }
    }
}

/// The nodes matched by an expression, in document order.
///
/// Borrowed from the queried document; supports repeated indexed access.
#[derive(Debug, Clone, PartialEq)]
pub struct NodeList<'d> {
    nodes: Vec<Node<'d>>,
}

impl<'d> NodeList<'d> {
    /// Returns the number of nodes.
    pub fn len(&self) -> usize {
        self.nodes.len()
    }

    /// Returns `true` if nothing matched.
    pub fn is_empty(&self) -> bool {
        self.nodes.is_empty()
    }

    /// Returns the node at `index`.
    pub fn get(&self, index: usize) -> Option<Node<'d>> {
        self.nodes.get(index).copied()
    }

    /// Returns the first node in document order.
    pub fn first(&self) -> Option<Node<'d>> {
        self.get(0)
    }

    /// Iterates over the nodes in document order.
    pub fn iter(&self) -> std::slice::Iter<'_, Node<'d>> {
        self.nodes.iter()
    }

    /// Consumes the list, returning the nodes.
    pub fn into_vec(self) -> Vec<Node<'d>> {
        self.nodes
    }
}

impl<'d> Index<usize> for NodeList<'d> {
    type Output = Node<'d>;

    fn index(&self, index: usize) -> &Self::Output {
        &self.nodes[index]
    }
}

impl<'d> IntoIterator for NodeList<'d> {
    type Item = Node<'d>;
    type IntoIter = std::vec::IntoIter<Node<'d>>;

    fn into_iter(self) -> Self::IntoIter {
        self.nodes.into_iter()
    }
}

impl<'a, 'd> IntoIterator for &'a NodeList<'d> {
    type Item = &'a Node<'d>;
    type IntoIter = std::slice::Iter<'a, Node<'d>>;

    fn into_iter(self) -> Self::IntoIter {
        self.nodes.iter()
    }
}

/// Selects every node matched by `path`, in document order.
///
/// No namespace bindings are installed; prefixed names fail to resolve.
///
/// # Errors
///
/// Returns an [`XPathError`] if the expression is malformed, cannot be
/// evaluated, or does not yield a node-set.
pub fn select_nodes<'d, N: Into<Node<'d>>>(path: &str, node: N) -> XPathResult<NodeList<'d>> {
    nodes(path, evaluate(path, node.into(), None)?)
}

/// Selects every node matched by `path`, resolving prefixes through `namespaces`.
///
/// # Errors
///
/// As [`select_nodes`]; additionally fails if `path` uses an unbound prefix.
pub fn select_nodes_ns<'d, N: Into<Node<'d>>>(
    path: &str,
    node: N,
    namespaces: &NamespaceBindings,
) -> XPathResult<NodeList<'d>> {
    nodes(path, evaluate(path, node.into(), Some(namespaces))?)
}

/// Selects the first node matched by `path` in document order.
///
/// Returns `Ok(None)` when nothing matches.
///
/// # Errors
///
/// As [`select_nodes`].
pub fn select_node<'d, N: Into<Node<'d>>>(path: &str, node: N) -> XPathResult<Option<Node<'d>>> {
    first_node(path, evaluate(path, node.into(), None)?)
}

/// Selects the first node matched by `path`, resolving prefixes through `namespaces`.
///
/// # Errors
///
/// As [`select_nodes_ns`].
pub fn select_node_ns<'d, N: Into<Node<'d>>>(
    path: &str,
    node: N,
    namespaces: &NamespaceBindings,
) -> XPathResult<Option<Node<'d>>> {
    first_node(path, evaluate(path, node.into(), Some(namespaces))?)
}

/// Evaluates `path` and converts the result to a string.
///
/// Element matches yield their text content, attribute matches their value,
/// and an empty match yields `""`. Scalar results use the usual XPath string
/// conversion.
///
/// # Errors
///
/// Returns an [`XPathError`] if the expression is malformed or cannot be evaluated.
pub fn select_text<'d, N: Into<Node<'d>>>(path: &str, node: N) -> XPathResult<String> {
    Ok(text(evaluate(path, node.into(), None)?))
}

/// Like [`select_text`], resolving prefixes through `namespaces`.
///
/// # Errors
///
/// As [`select_text`]; additionally fails if `path` uses an unbound prefix.
pub fn select_text_ns<'d, N: Into<Node<'d>>>(
    path: &str,
    node: N,
    namespaces: &NamespaceBindings,
) -> XPathResult<String> {
    Ok(text(evaluate(path, node.into(), Some(namespaces))?))
}

fn evaluate<'d>(
    path: &str,
    node: Node<'d>,
    namespaces: Option<&NamespaceBindings>,
) -> XPathResult<Value<'d>> {
    tracing::trace!(
        expression = path,
        namespaces = namespaces.map_or(0, NamespaceBindings::len),
        "evaluating XPath"
    );

    let factory = Factory::new();
    let xpath = factory
        .build(path)
        .map_err(|source| XPathError::Compile {
            expression: path.to_string(),
            source: source.into(),
        })?
        .ok_or_else(|| XPathError::Empty {
            expression: path.to_string(),
        })?;

    if let Some(prefix) = prefixes(path).into_iter().find(|prefix| match namespaces {
        Some(ns) => *prefix != "xml" && ns.get(prefix).is_none(),
        None => true,
    }) {
        return Err(XPathError::UnboundPrefix {
            expression: path.to_string(),
            prefix: prefix.to_string(),
        });
    }

    let mut context = Context::new();
    if let Some(namespaces) = namespaces {
        context.set_namespace("xml", XML_NAMESPACE);
        for (prefix, uri) in namespaces.iter() {
            context.set_namespace(prefix, uri);
        }
    }

    xpath
        .evaluate(&context, node)
        .map_err(|source| XPathError::Evaluate {
            expression: path.to_string(),
            source,
        })
}

/// Returns the namespace prefixes of the qualified names in `path`.
///
/// Skips string literals and axis separators (`::`).
fn prefixes(path: &str) -> Vec<&str> {
    let is_name_char = |c: char| c.is_alphanumeric() || matches!(c, '-' | '_' | '.') || !c.is_ascii();
    let is_name_start = |c: char| c.is_alphabetic() || c == '_' || !c.is_ascii();

    let chars: Vec<(usize, char)> = path.char_indices().collect();
    let mut found = Vec::new();
    let mut quote = None;
    let mut name_start = None;

    for (i, &(offset, c)) in chars.iter().enumerate() {
        if let Some(q) = quote {
            if c == q {
                quote = None;
            }
            continue;
        }
        match c {
            '\'' | '"' => {
                quote = Some(c);
                name_start = None;
            }
            ':' => {
                let prev = i.checked_sub(1).map(|j| chars[j].1);
                let next = chars.get(i + 1).map(|&(_, n)| n);
                if let Some(start) = name_start.filter(|_| prev != Some(':') && next != Some(':')) {
                    if next.is_some_and(|n| is_name_start(n) || n == '*') {
                        found.push(&path[start..offset]);
                    }
                }
                name_start = None;
            }
            c if is_name_char(c) => {
                if name_start.is_none() && is_name_start(c) {
                    name_start = Some(offset);
                }
            }
            _ => name_start = None,
        }
    }
    found
}

fn text(value: Value<'_>) -> String {
    match value {
        // Negative zero converts to "0" like positive zero.
        Value::Number(n) if n == 0.0 => "0".to_string(),
        other => other.string(),
    }
}

fn nodes<'d>(path: &str, value: Value<'d>) -> XPathResult<NodeList<'d>> {
    match value {
        Value::Nodeset(nodeset) => Ok(NodeList {
            nodes: nodeset.document_order(),
        }),
        other => Err(not_a_nodeset(path, &other)),
    }
}

fn first_node<'d>(path: &str, value: Value<'d>) -> XPathResult<Option<Node<'d>>> {
    match value {
        Value::Nodeset(nodeset) => Ok(nodeset.document_order_first()),
        other => Err(not_a_nodeset(path, &other)),
    }
}

fn not_a_nodeset(path: &str, value: &Value<'_>) -> XPathError {
    let found = match value {
        Value::Boolean(_) => "boolean",
        Value::Number(_) => "number",
        Value::String(_) => "string",
        Value::Nodeset(_) => "node-set",
    };
    XPathError::NotANodeset {
        expression: path.to_string(),
        found,
    }
}
