use crate::api::error::AppError;
use crate::models::ResourceType;

/// Parses an `include` query value into relationship names of `resource`.
///
/// Names are comma separated and de-duplicated in order. Nested paths and
/// names the type does not declare are rejected.
pub fn parse_include(raw: Option<&str>, resource: &ResourceType) -> Result<Vec<String>, AppError> {
    let Some(raw) = raw else {
        return Ok(Vec::new());
    };

    let mut names: Vec<String> = Vec::new();
    for name in raw.split(',').map(str::trim).filter(|n| !n.is_empty()) {
        if name.contains('.') {
            return Err(AppError::BadRequest(format!(
                "Nested include path '{}' is not supported",
                name
            )));
        }
        if resource.relationship(name).is_none() {
            return Err(AppError::BadRequest(format!(
                "'{}' is not a relationship of {}",
                name, resource.kind
            )));
        }
        if !names.iter().any(|n| n == name) {
            names.push(name.to_string());
        }
    }

    Ok(names)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::{ResourceKind, ResourceRegistry};

    fn files() -> ResourceType {
        ResourceRegistry::with_default_types()
            .get(ResourceKind::FileModel)
            .cloned()
            .unwrap()
    }

    #[test]
    fn test_absent_include() {
        assert!(parse_include(None, &files()).unwrap().is_empty());
        assert!(parse_include(Some(""), &files()).unwrap().is_empty());
    }

    #[test]
    fn test_include_dedup() {
        let names = parse_include(Some("parent, parent"), &files()).unwrap();
        assert_eq!(names, vec!["parent".to_string()]);
    }

    #[test]
    fn test_include_rejects_unknown_and_nested() {
        assert!(matches!(
            parse_include(Some("owner"), &files()),
            Err(AppError::BadRequest(_))
        ));
        assert!(matches!(
            parse_include(Some("parent.author"), &files()),
            Err(AppError::BadRequest(_))
        ));
    }
}
