//! Construction of Octane REST query expressions.
//!
//! The server expects the `query` parameter wrapped in literal double quotes
//! and parentheses, e.g. `query="(name EQ ^R1^)"`. String literals go in
//! carets, entity references in braces, conjunction is `;`.

use crate::core::types::{ModuleSelector, ReleaseSelector, ScopeFilter, TestVersionFilter};

#[derive(Debug, Clone, PartialEq, Eq)]
pub(crate) enum Value {
    Str(String),
    Number(u64),
    NullRef,
    Ref(Box<Condition>),
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub(crate) enum Condition {
    Eq { field: &'static str, value: Value },
    In { field: &'static str, values: Vec<Value> },
    And(Vec<Condition>),
}

impl Condition {
    pub(crate) fn eq(field: &'static str, value: Value) -> Self {
        Condition::Eq { field, value }
    }

    pub(crate) fn and(self, other: Condition) -> Self {
        match self {
            Condition::And(mut conditions) => {
                conditions.push(other);
                Condition::And(conditions)
            }
            first => Condition::And(vec![first, other]),
        }
    }

    pub(crate) fn to_query_param(&self) -> String {
        format!("\"({})\"", self.render())
    }

    fn render(&self) -> String {
        match self {
            Condition::Eq { field, value } => format!("{} EQ {}", field, value.render()),
            Condition::In { field, values } => {
                let rendered: Vec<String> = values.iter().map(Value::render).collect();
                format!("{} IN {}", field, rendered.join(","))
            }
            Condition::And(conditions) => conditions
                .iter()
                .map(Condition::render)
                .collect::<Vec<_>>()
                .join(";"),
        }
    }
}

impl Value {
    fn render(&self) -> String {
        match self {
            Value::Str(literal) => format!("^{}^", literal),
            Value::Number(number) => number.to_string(),
            Value::NullRef => "{null}".to_string(),
            Value::Ref(condition) => format!("{{{}}}", condition.render()),
        }
    }
}

pub(crate) fn release_condition(selector: &ReleaseSelector) -> Condition {
    match selector {
        ReleaseSelector::CurrentRelease => Condition::In {
            field: "id",
            values: vec![Value::Str("current_release".to_string())],
        },
        ReleaseSelector::Id(id) => Condition::eq("id", Value::Number(*id)),
        ReleaseSelector::Name(name) => Condition::eq("name", Value::Str(name.clone())),
    }
}

pub(crate) fn module_condition(selector: &ModuleSelector) -> Condition {
    match selector {
        ModuleSelector::Id(id) => Condition::eq("id", Value::Number(*id)),
        ModuleSelector::Root => {
            Condition::eq("logical_name", Value::Str("product_area.root".to_string()))
        }
    }
}

pub(crate) fn test_version_condition(filter: &TestVersionFilter) -> Option<Condition> {
    let scope = match &filter.scope {
        ScopeFilter::All => None,
        ScopeFilter::Unassigned => Some(Condition::eq(
            "test",
            Value::Ref(Box::new(Condition::eq("product_areas", Value::NullRef))),
        )),
        ScopeFilter::Path(path) => Some(Condition::eq(
            "test",
            Value::Ref(Box::new(Condition::eq(
                "product_areas",
                Value::Ref(Box::new(Condition::eq("path", Value::Str(path.clone())))),
            ))),
        )),
    };
    let comment = filter
        .comment
        .as_ref()
        .map(|value| Condition::eq("comment", Value::Str(value.clone())));

    match (scope, comment) {
        (Some(scope), Some(comment)) => Some(scope.and(comment)),
        (Some(scope), None) => Some(scope),
        (None, Some(comment)) => Some(comment),
        (None, None) => None,
    }
}
