//! Resolver that groups other resolvers.

use crate::error::{MigrateError, Result};

use super::{MigrationResolver, ResolvedMigration, ResolverNode};

/// Resolves all children and merges their scripts in version order.
pub struct CompositeResolver {
    children: Vec<Box<dyn MigrationResolver>>,
}

impl CompositeResolver {
    /// Create a composite over `children`, kept in the given order.
    pub fn new(children: Vec<Box<dyn MigrationResolver>>) -> Self {
        Self { children }
    }

    /// Child resolvers.
    pub fn children(&self) -> &[Box<dyn MigrationResolver>] {
        &self.children
    }
}

impl MigrationResolver for CompositeResolver {
    fn describe(&self) -> String {
        format!("composite({} children)", self.children.len())
    }

    fn resolve(&self) -> Result<Vec<ResolvedMigration>> {
        let mut migrations = Vec::new();
        for child in &self.children {
            migrations.extend(child.resolve()?);
        }
        migrations.sort_by(|a, b| a.version.cmp(&b.version));

        if let Some(pair) = migrations
            .windows(2)
            .find(|pair| pair[0].version == pair[1].version)
        {
            return Err(MigrateError::Validation(format!(
                "Found more than one migration with version {} ({} in {:?}, {} in {:?})",
                pair[0].version, pair[0].script, pair[0].location, pair[1].script, pair[1].location
            )));
        }

        Ok(migrations)
    }

    fn node(&self) -> ResolverNode<'_> {
        ResolverNode::Composite(&self.children)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::resolver::MigrationVersion;
    use std::path::PathBuf;

    struct Fixed(Vec<&'static str>);

    impl MigrationResolver for Fixed {
        fn describe(&self) -> String {
            "fixed".to_string()
        }

        fn resolve(&self) -> Result<Vec<ResolvedMigration>> {
            Ok(self
                .0
                .iter()
                .map(|raw| ResolvedMigration {
                    version: MigrationVersion::parse(raw).unwrap(),
                    description: String::new(),
                    script: format!("V{}__x.sql", raw),
                    location: PathBuf::from("mem"),
                    sql: String::new(),
                    checksum: String::new(),
                })
                .collect())
        }
    }

    #[test]
    fn test_merges_children_in_version_order() {
        let composite = CompositeResolver::new(vec![
            Box::new(Fixed(vec!["3", "1"])),
            Box::new(Fixed(vec!["1.10", "1.2"])),
        ]);
        let versions: Vec<String> = composite
            .resolve()
            .unwrap()
            .iter()
            .map(|m| m.version.to_string())
            .collect();
        assert_eq!(versions, ["1", "1.2", "1.10", "3"]);
    }

    #[test]
    fn test_duplicate_versions_rejected() {
        let composite = CompositeResolver::new(vec![
            Box::new(Fixed(vec!["1"])),
            Box::new(Fixed(vec!["1.0"])),
        ]);
        let err = composite.resolve().unwrap_err();
        assert!(matches!(err, MigrateError::Validation(_)));
        assert!(err.to_string().contains("more than one migration with version 1"));
    }

    #[test]
    fn test_exposes_children() {
        let composite = CompositeResolver::new(vec![Box::new(Fixed(vec![]))]);
        match composite.node() {
            ResolverNode::Composite(children) => assert_eq!(children.len(), 1),
            _ => panic!("expected composite node"),
        }
    }
}
