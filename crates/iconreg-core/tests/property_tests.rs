use iconreg_core::{
    MutationOptions, Origin, Registrar, ReconciliationEngine, ResourceEntity, Settings,
};
use iconreg_fs::NormalizedPath;
use iconreg_test_utils::TestPlugin;
use proptest::collection::btree_set;
use proptest::prelude::*;
use std::collections::BTreeSet;

fn entities(names: &BTreeSet<String>) -> Vec<ResourceEntity> {
    names
        .iter()
        .map(|name| ResourceEntity {
            name: name.clone(),
            path: NormalizedPath::new(format!("/p/Resources/{name}.svg")),
            origin: Origin::Plugin,
        })
        .collect()
}

proptest! {
    #[test]
    fn test_reconcile_partitions_and_converges(
        resources in btree_set("[a-z]{1,6}", 0..12),
        registered in btree_set("[a-z]{1,6}", 0..12),
        foreign in btree_set("[A-Z][a-z]{0,4}\\.[a-z]{1,4}", 0..4),
    ) {
        let engine = ReconciliationEngine::new("NS");
        let mut names: BTreeSet<String> = registered.iter().map(|n| engine.qualify(n)).collect();
        names.extend(foreign.iter().filter(|n| !n.starts_with("NS.")).cloned());
        let resources = entities(&resources);

        let first = engine.reconcile(&resources, &names);
        prop_assert_eq!(&first, &engine.reconcile(&resources, &names));

        for missing in &first.missing {
            prop_assert!(!names.contains(&engine.qualify(&missing.name)));
        }
        for orphan in &first.orphaned {
            prop_assert!(orphan.starts_with("NS."));
            prop_assert!(!resources.iter().any(|r| &engine.qualify(&r.name) == orphan));
        }

        // apply the result and reconcile again
        let mut applied = names.clone();
        for orphan in &first.orphaned {
            applied.remove(orphan);
        }
        applied.extend(first.missing.iter().map(|r| engine.qualify(&r.name)));
        prop_assert!(engine.reconcile(&resources, &applied).is_clean());
    }
}

proptest! {
    #![proptest_config(ProptestConfig::with_cases(12))]

    #[test]
    fn test_sync_is_idempotent_on_disk(
        resources in btree_set("[a-z]{1,6}", 0..6),
        registered in btree_set("[a-z]{1,6}", 0..6),
    ) {
        let plugin = TestPlugin::new();
        let resource_names: Vec<&str> = resources.iter().map(String::as_str).collect();
        let registered_names: Vec<&str> = registered.iter().map(String::as_str).collect();
        plugin.add_resources(&resource_names);
        plugin.write_artifacts(&registered_names);
        let mut registrar =
            Registrar::open(NormalizedPath::new(plugin.plugin_root()), Settings::default(), None)
                .unwrap();

        let first = registrar.sync(MutationOptions::default()).unwrap();
        prop_assert_eq!(first.failures().count(), 0);
        prop_assert!(registrar.reconcile().is_clean());

        let second = registrar.sync(MutationOptions::default()).unwrap();
        prop_assert!(second.is_noop());
    }
}
