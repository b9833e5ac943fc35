use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub(crate) struct Release {
    pub id: String,
    pub name: String,
    #[serde(default)]
    pub activity_level: i64,
}

impl Release {
    /// Octane encodes "active" as activity level 0.
    pub(crate) fn is_active(&self) -> bool {
        self.activity_level == 0
    }

    pub(crate) fn to_ref(&self) -> EntityRef {
        EntityRef {
            id: self.id.clone(),
            entity_type: Some("release".to_string()),
            name: Some(self.name.clone()),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub(crate) struct ApplicationModule {
    pub id: String,
    pub name: String,
    #[serde(default)]
    pub logical_name: Option<String>,
    pub path: String,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub(crate) struct EntityRef {
    pub id: String,
    #[serde(rename = "type", default, skip_serializing_if = "Option::is_none")]
    pub entity_type: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub(crate) struct ReferenceList {
    #[serde(default)]
    pub data: Vec<EntityRef>,
}

#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub(crate) struct TestVersion {
    pub id: String,
    #[serde(default)]
    pub name: Option<String>,
    #[serde(default)]
    pub comment: Option<String>,
    pub test: EntityRef,
    #[serde(default)]
    pub releases: ReferenceList,
}

#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub(crate) struct EntityPage<T> {
    pub total_count: u64,
    pub data: Vec<T>,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub(crate) enum ReleaseSelector {
    CurrentRelease,
    Id(u64),
    Name(String),
}

impl ReleaseSelector {
    pub(crate) fn from_arg(arg: Option<&str>) -> Self {
        match arg {
            None | Some("") => ReleaseSelector::CurrentRelease,
            Some(raw) => match raw.parse::<u64>() {
                Ok(id) => ReleaseSelector::Id(id),
                Err(_) => ReleaseSelector::Name(raw.to_string()),
            },
        }
    }

    pub(crate) fn field(&self) -> &'static str {
        match self {
            ReleaseSelector::CurrentRelease | ReleaseSelector::Id(_) => "id",
            ReleaseSelector::Name(_) => "name",
        }
    }

    pub(crate) fn value(&self) -> String {
        match self {
            ReleaseSelector::CurrentRelease => "current_release".to_string(),
            ReleaseSelector::Id(id) => id.to_string(),
            ReleaseSelector::Name(name) => name.clone(),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub(crate) enum ModuleSelector {
    Id(u64),
    Root,
}

impl ModuleSelector {
    pub(crate) fn field(&self) -> &'static str {
        match self {
            ModuleSelector::Id(_) => "id",
            ModuleSelector::Root => "logical_name",
        }
    }

    pub(crate) fn value(&self) -> String {
        match self {
            ModuleSelector::Id(id) => id.to_string(),
            ModuleSelector::Root => "product_area.root".to_string(),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub(crate) enum ModuleScope {
    AllTests,
    UnassignedTests,
    Module(ApplicationModule),
}

impl ModuleScope {
    pub(crate) fn filter(&self) -> ScopeFilter {
        match self {
            ModuleScope::AllTests => ScopeFilter::All,
            ModuleScope::UnassignedTests => ScopeFilter::Unassigned,
            ModuleScope::Module(module) => ScopeFilter::Path(module.path.clone()),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub(crate) enum ScopeFilter {
    All,
    Unassigned,
    Path(String),
}

/// Interpretation of the configured `versionToUpdate` string.
#[derive(Debug, Clone, PartialEq, Eq)]
pub(crate) enum CommentFilter {
    Any,
    NonEmpty,
    Match(String),
}

impl CommentFilter {
    pub(crate) fn from_config(raw: &str) -> Self {
        match raw {
            "" => CommentFilter::Any,
            "*" => CommentFilter::NonEmpty,
            other => CommentFilter::Match(other.to_string()),
        }
    }

    /// Value for the server-side `comment` condition. Octane treats `*`
    /// inside the caret literal as a wildcard, so `NonEmpty` maps to `*`.
    pub(crate) fn query_value(&self) -> Option<&str> {
        match self {
            CommentFilter::Any => None,
            CommentFilter::NonEmpty => Some("*"),
            CommentFilter::Match(pattern) => Some(pattern),
        }
    }

    pub(crate) fn requires_nonempty_comment(&self) -> bool {
        matches!(self, CommentFilter::NonEmpty)
    }

    pub(crate) fn logs_full_comment(&self) -> bool {
        self.query_value().is_some_and(|value| value.contains('*'))
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub(crate) struct TestVersionFilter {
    pub scope: ScopeFilter,
    pub comment: Option<String>,
}

impl TestVersionFilter {
    pub(crate) fn new(scope: &ModuleScope, comment_filter: &CommentFilter) -> Self {
        Self {
            scope: scope.filter(),
            comment: comment_filter.query_value().map(str::to_string),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn release_selector_defaults_to_current_release() {
        assert_eq!(
            ReleaseSelector::from_arg(None),
            ReleaseSelector::CurrentRelease
        );
        assert_eq!(
            ReleaseSelector::from_arg(Some("")),
            ReleaseSelector::CurrentRelease
        );
    }

    #[test]
    fn release_selector_distinguishes_id_and_name() {
        assert_eq!(
            ReleaseSelector::from_arg(Some("1001")),
            ReleaseSelector::Id(1001)
        );
        assert_eq!(
            ReleaseSelector::from_arg(Some("Sprint 7")),
            ReleaseSelector::Name("Sprint 7".to_string())
        );
    }

    #[test]
    fn comment_filter_from_config_string() {
        assert_eq!(CommentFilter::from_config(""), CommentFilter::Any);
        assert_eq!(CommentFilter::from_config("*"), CommentFilter::NonEmpty);
        assert_eq!(
            CommentFilter::from_config("v1.2"),
            CommentFilter::Match("v1.2".to_string())
        );
    }

    #[test]
    fn comment_filter_wildcard_logging() {
        assert!(CommentFilter::NonEmpty.logs_full_comment());
        assert!(CommentFilter::Match("v1.*".to_string()).logs_full_comment());
        assert!(!CommentFilter::Match("v1.2".to_string()).logs_full_comment());
        assert!(!CommentFilter::Any.logs_full_comment());
    }

    #[test]
    fn only_nonempty_sentinel_requires_a_comment() {
        assert!(CommentFilter::NonEmpty.requires_nonempty_comment());
        assert!(!CommentFilter::Any.requires_nonempty_comment());
        assert!(!CommentFilter::Match("v1.*".to_string()).requires_nonempty_comment());
    }

    #[test]
    fn test_version_tolerates_missing_optional_fields() {
        let raw = r#"{
            "id": "2001",
            "test": {"id": "42", "type": "test"}
        }"#;

        let version: TestVersion = serde_json::from_str(raw).unwrap();

        assert_eq!(version.id, "2001");
        assert!(version.comment.is_none());
        assert!(version.releases.data.is_empty());
        assert_eq!(version.test.id, "42");
    }

    #[test]
    fn release_ref_carries_entity_type() {
        let release = Release {
            id: "1001".to_string(),
            name: "R1".to_string(),
            activity_level: 0,
        };

        let reference = release.to_ref();
        assert_eq!(reference.id, "1001");
        assert_eq!(reference.entity_type.as_deref(), Some("release"));
        assert_eq!(
            serde_json::to_value(&reference).unwrap(),
            serde_json::json!({"id": "1001", "type": "release", "name": "R1"})
        );
    }
}
