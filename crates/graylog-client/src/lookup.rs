use graylog_core::{GraylogError, Result};

use crate::resources::{RemoteResource, ResourceClient};

/// How a lookup identifies its record.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Lookup {
    Id(String),
    Title(String),
}

impl Lookup {
    /// Prefer the id when both are given. Empty strings count as absent.
    pub fn from_parts(label: &str, id: Option<String>, title: Option<String>) -> Result<Self> {
        match (
            id.filter(|s| !s.is_empty()),
            title.filter(|s| !s.is_empty()),
        ) {
            (Some(id), _) => Ok(Self::Id(id)),
            (None, Some(title)) => Ok(Self::Title(title)),
            (None, None) => Err(GraylogError::validation(format!(
                "either 'id' or 'title' must be provided to identify the {label}"
            ))),
        }
    }
}

/// Reduce title matches to exactly one record.
pub fn single_by_title<R: RemoteResource>(title: &str, mut matches: Vec<R>) -> Result<R> {
    let label = R::descriptor().label;
    match matches.len() {
        0 => Err(GraylogError::not_found(label, "title", title)),
        1 => Ok(matches.remove(0)),
        n => Err(GraylogError::ambiguous(label, title, n)),
    }
}

impl<R: RemoteResource> ResourceClient<R> {
    /// The one record titled `title`.
    pub async fn find_by_title(&self, title: &str) -> Result<R> {
        let matches = self.search(title).await?;
        single_by_title(title, matches)
    }

    /// Resolve a lookup, then fetch the record by id.
    ///
    /// A 404 on the final fetch becomes [`GraylogError::NotFound`].
    pub async fn lookup(&self, lookup: &Lookup) -> Result<R> {
        let label = R::descriptor().label;
        let id = match lookup {
            Lookup::Id(id) => id.clone(),
            Lookup::Title(title) => {
                let found = self.find_by_title(title).await?;
                found
                    .id()
                    .map(str::to_string)
                    .ok_or_else(|| GraylogError::not_found(label, "title", title.as_str()))?
            }
        };
        self.get(&id).await.map_err(|e| {
            if e.is_not_found() {
                GraylogError::not_found(label, "id", id.as_str())
            } else {
                e
            }
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::resources::EventDefinition;
    use graylog_core::ErrorCategory;
    use serde_json::json;

    fn def(id: &str, title: &str) -> EventDefinition {
        serde_json::from_value(json!({"id": id, "title": title})).unwrap()
    }

    #[test]
    fn test_disambiguation() {
        let all = vec![def("1", "a"), def("2", "b"), def("3", "b")];
        let by_title = |t: &str| {
            all.iter()
                .filter(|d| d.title == t)
                .cloned()
                .collect::<Vec<_>>()
        };

        let a = single_by_title("a", by_title("a")).unwrap();
        assert_eq!(a.id.as_deref(), Some("1"));

        let err = single_by_title("b", by_title("b")).unwrap_err();
        assert_eq!(err.category(), ErrorCategory::Ambiguous);
        assert_eq!(
            err.to_string(),
            "Multiple event definitions found with title: b. Please use id instead."
        );

        let err = single_by_title("c", by_title("c")).unwrap_err();
        assert_eq!(err.category(), ErrorCategory::NotFound);
        assert_eq!(err.to_string(), "No event definition found with title: c");
    }

    #[test]
    fn test_lookup_from_parts() {
        assert_eq!(
            Lookup::from_parts("input", Some("x".into()), Some("t".into())).unwrap(),
            Lookup::Id("x".into())
        );
        assert_eq!(
            Lookup::from_parts("input", Some(String::new()), Some("t".into())).unwrap(),
            Lookup::Title("t".into())
        );
        let err = Lookup::from_parts("input", None, None).unwrap_err();
        assert_eq!(err.category(), ErrorCategory::Validation);
    }
}
