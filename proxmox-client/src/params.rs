use std::collections::btree_map::{self, BTreeMap};
use std::fmt::Display;

use serde::Serialize;

use crate::IndexedFamily;

/// The flat set of parameters sent along with one API request.
///
/// Keys are the *wire names* the remote schema expects (`api-path-prefix`, `type`, `net0`),
/// values are already in their textual wire representation. Absent optional values never end up
/// in here, which is different from a present but empty value.
///
/// ```rust
/// use proxmox_client::{IndexedFamily, ParameterSet};
///
/// let mut net = IndexedFamily::new();
/// net.insert(0, "virtio,bridge=vmbr0".to_string());
///
/// let mut params = ParameterSet::new();
/// params
///     .arg("vmid", 100)
///     .maybe_arg("name", None::<&str>)
///     .maybe_bool_arg("start", Some(true))
///     .indexed_args("net", &net);
///
/// assert_eq!(params.get("vmid"), Some("100"));
/// assert_eq!(params.get("start"), Some("1"));
/// assert_eq!(params.get("net0"), Some("virtio,bridge=vmbr0"));
/// assert!(!params.contains("name"));
/// ```
#[derive(Clone, Debug, Default, Eq, PartialEq, Serialize)]
#[serde(transparent)]
pub struct ParameterSet {
    inner: BTreeMap<String, String>,
}

impl ParameterSet {
    pub fn new() -> Self {
        Self::default()
    }

    /// Adds a parameter, replacing any previous value of the same name.
    pub fn arg<T: Display>(&mut self, name: &str, value: T) -> &mut Self {
        self.inner.insert(name.to_string(), value.to_string());
        self
    }

    /// Adds a parameter only if `value` is `Some`.
    pub fn maybe_arg<T: Display>(&mut self, name: &str, value: Option<T>) -> &mut Self {
        if let Some(value) = value {
            self.arg(name, value);
        }
        self
    }

    /// Adds a boolean in the perl-friendly fashion, `true` becomes `"1"` and `false` `"0"`.
    pub fn bool_arg(&mut self, name: &str, value: bool) -> &mut Self {
        self.inner
            .insert(name.to_string(), if value { "1" } else { "0" }.to_string());
        self
    }

    /// Adds a boolean only if `value` is `Some`. See [`bool_arg`](Self::bool_arg).
    pub fn maybe_bool_arg(&mut self, name: &str, value: Option<bool>) -> &mut Self {
        if let Some(value) = value {
            self.bool_arg(name, value);
        }
        self
    }

    /// Adds a list for `<type>-list` parameters.
    ///
    /// The entries are joined with NUL bytes so the server side `split_list()` gets the original
    /// elements back.
    pub fn list_arg<I>(&mut self, name: &str, values: I) -> &mut Self
    where
        I: IntoIterator<Item: Display>,
    {
        let mut list = String::new();
        for (i, entry) in values.into_iter().enumerate() {
            if i > 0 {
                list.push('\0');
            }
            list.push_str(&entry.to_string());
        }
        self.inner.insert(name.to_string(), list);
        self
    }

    /// Adds a list only if `values` is `Some`. See [`list_arg`](Self::list_arg).
    pub fn maybe_list_arg<T: Display>(&mut self, name: &str, values: Option<&[T]>) -> &mut Self {
        if let Some(values) = values {
            self.list_arg(name, values);
        }
        self
    }

    /// Flattens an indexed family into `prefix0`, `prefix1`, ...
    ///
    /// An empty family adds nothing. Indices are not checked against any upper bound.
    pub fn indexed_args<T: Display>(
        &mut self,
        prefix: &str,
        family: &IndexedFamily<T>,
    ) -> &mut Self {
        for (index, value) in family {
            self.inner.insert(format!("{prefix}{index}"), value.to_string());
        }
        self
    }

    /// Flattens an optional indexed family. See [`indexed_args`](Self::indexed_args).
    pub fn maybe_indexed_args<T: Display>(
        &mut self,
        prefix: &str,
        family: Option<&IndexedFamily<T>>,
    ) -> &mut Self {
        if let Some(family) = family {
            self.indexed_args(prefix, family);
        }
        self
    }

    pub fn get(&self, name: &str) -> Option<&str> {
        self.inner.get(name).map(String::as_str)
    }

    pub fn contains(&self, name: &str) -> bool {
        self.inner.contains_key(name)
    }

    pub fn remove(&mut self, name: &str) -> Option<String> {
        self.inner.remove(name)
    }

    pub fn len(&self) -> usize {
        self.inner.len()
    }

    pub fn is_empty(&self) -> bool {
        self.inner.is_empty()
    }

    pub fn iter(&self) -> btree_map::Iter<'_, String, String> {
        self.inner.iter()
    }

    /// Encode as a query string including the leading `?`, or an empty string for an empty set.
    pub fn to_query_string(&self) -> String {
        let mut query = String::new();
        let mut separator = '?';
        for (name, value) in &self.inner {
            query.push(separator);
            separator = '&';
            push_encoded(&mut query, name);
            query.push('=');
            push_encoded(&mut query, value);
        }
        query
    }

    /// Encode as an `application/x-www-form-urlencoded` request body.
    pub fn to_form_body(&self) -> String {
        form_urlencoded::Serializer::new(String::new())
            .extend_pairs(&self.inner)
            .finish()
    }
}

fn push_encoded(out: &mut String, value: &str) {
    out.extend(percent_encoding::percent_encode(
        value.as_bytes(),
        percent_encoding::NON_ALPHANUMERIC,
    ));
}

impl<'a> IntoIterator for &'a ParameterSet {
    type Item = (&'a String, &'a String);
    type IntoIter = btree_map::Iter<'a, String, String>;

    fn into_iter(self) -> Self::IntoIter {
        self.inner.iter()
    }
}

impl IntoIterator for ParameterSet {
    type Item = (String, String);
    type IntoIter = btree_map::IntoIter<String, String>;

    fn into_iter(self) -> Self::IntoIter {
        self.inner.into_iter()
    }
}

impl Extend<(String, String)> for ParameterSet {
    fn extend<I: IntoIterator<Item = (String, String)>>(&mut self, iter: I) {
        self.inner.extend(iter)
    }
}

impl FromIterator<(String, String)> for ParameterSet {
    fn from_iter<I: IntoIterator<Item = (String, String)>>(iter: I) -> Self {
        Self {
            inner: iter.into_iter().collect(),
        }
    }
}
