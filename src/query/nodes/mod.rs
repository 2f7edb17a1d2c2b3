//! Query node implementations

mod bool_query;
mod match_query;
mod object_query;
mod prefix_query;
mod term_query;

pub use bool_query::BoolQuery;
pub use match_query::MatchQuery;
pub use object_query::ObjectQuery;
pub use prefix_query::PrefixQuery;
pub use term_query::TermQuery;

#[cfg(test)]
pub(crate) mod tests {
    use crate::index::SearchIndex;

    /// A small documentation set shared by the node tests: an "acme" SDK
    /// with a client module, one class, one function and a user guide.
    pub(crate) fn sample_context_index() -> SearchIndex {
        let raw = serde_json::from_str(
            r#"{
                "docnames": ["index", "api/acme", "api/acme.client",
                             "api/acme.client.Client", "api/acme.client.connect",
                             "changelog", "guide"],
                "filenames": ["index.rst", "api/acme.rst", "api/acme.client.rst",
                              "api/acme.client.Client.rst", "api/acme.client.connect.rst",
                              "changelog.rst", "guide.rst"],
                "titles": ["Acme SDK", "acme", "acme.client", "acme.client.Client",
                           "acme.client.connect", "Changelog", "User guide"],
                "envversion": {"sphinx": 56},
                "objects": {
                    "": [[1, 0, 0, "-", "acme"]],
                    "acme": [[2, 0, 0, "-", "client"]],
                    "acme.client": [[3, 1, 1, "", "Client"], [4, 3, 1, "", "connect"]],
                    "acme.client.Client": [[3, 2, 1, "", "run"], [3, 4, 1, "", "status"]]
                },
                "objnames": {
                    "0": ["py", "module", "Python module"],
                    "1": ["py", "class", "Python class"],
                    "2": ["py", "method", "Python method"],
                    "3": ["py", "function", "Python function"],
                    "4": ["py", "property", "Python property"]
                },
                "objtypes": {
                    "0": "py:module",
                    "1": "py:class",
                    "2": "py:method",
                    "3": "py:function",
                    "4": "py:property"
                },
                "terms": {
                    "backend": [1, 2],
                    "backends": 6,
                    "changelog": 5,
                    "client": [2, 3, 6],
                    "connect": [4, 6],
                    "guide": 6,
                    "install": 6,
                    "run": 3,
                    "sdk": [0, 6],
                    "version": 5
                },
                "titleterms": {
                    "acme": [1, 2, 3, 4],
                    "changelog": 5,
                    "client": [2, 3, 4],
                    "connect": 4,
                    "guide": 6,
                    "sdk": 0,
                    "user": 6
                }
            }"#,
        )
        .unwrap();
        SearchIndex::compile(raw).unwrap()
    }
}
