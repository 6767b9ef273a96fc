//! Behaviour tests for the layer lint over a backend tree written to disk.

use std::collections::BTreeMap;

use architecture_lint::{ArchitectureLintError, Violation, lint_backend_sources};
use camino::{Utf8Path, Utf8PathBuf};
use cap_std::ambient_authority;
use cap_std::fs::Dir;
use rstest::fixture;
use rstest_bdd::Slot;
use rstest_bdd_macros::{ScenarioState, given, scenario, then, when};
use tempfile::TempDir;

/// Files of a backend that respects every layer rule.
const LAYERED_TREE: &[(&str, &str)] = &[
    ("domain/staff.rs", "pub struct StaffAccess { account: i64 }"),
    (
        "domain/ports/network_command.rs",
        "use crate::domain::staff::StaffAccess;\n\
         pub trait NetworkCommand {\n\
         fn clear_debt(&self, access: &StaffAccess, ids: Vec<i64>) -> u64;\n\
         }",
    ),
    (
        "domain/network_service.rs",
        "use super::ports::network_command::NetworkCommand;\n\
         use mockable::Clock;\n\
         pub struct NetworkService<R> { nodes: R }",
    ),
    ("domain/network/level.rs", "pub struct NodeLevel(u32);"),
    (
        "inbound/http/staff_guard.rs",
        "use actix_web::HttpMessage;\n\
         use crate::domain::staff::StaffAccess;\n\
         pub struct StaffCaller(pub StaffAccess);",
    ),
    (
        "inbound/http/nodes.rs",
        "use actix_web::web;\n\
         use pagination::PageParams;\n\
         use super::staff_guard::StaffCaller;\n\
         use crate::domain::ports::network_command::NetworkCommand;\n\
         async fn clear_debt(caller: StaffCaller) {}",
    ),
    ("inbound/http/test_utils.rs", "use super::state::HttpState;"),
    (
        "outbound/memory/network_store.rs",
        "use tokio::sync::Mutex;\n\
         use crate::domain::ports::network_command::NetworkCommand;\n\
         pub struct InMemoryNetworkStore;",
    ),
    (
        "outbound/persistence/diesel_contact_repository.rs",
        "use diesel::prelude::*;\n\
         use diesel_async::RunQueryDsl;\n\
         pub struct DieselContactRepository;",
    ),
];

#[derive(Debug, Clone)]
enum Outcome {
    Clean,
    Broken(Vec<Violation>),
    Unreadable(Utf8PathBuf),
}

#[derive(Default, ScenarioState)]
struct World {
    files: Slot<BTreeMap<Utf8PathBuf, String>>,
    outcome: Slot<Outcome>,
}

impl World {
    fn edit(&self, file: &str, change: impl FnOnce(&mut String)) {
        let mut files = self.files.get().unwrap_or_default();
        change(files.entry(Utf8PathBuf::from(file)).or_default());
        self.files.set(files);
    }

    fn violations(&self) -> Vec<Violation> {
        match self.outcome.get().expect("lint should have run") {
            Outcome::Broken(violations) => violations,
            other => panic!("expected boundary violations, got {other:?}"),
        }
    }
}

#[fixture]
fn world() -> World {
    World::default()
}

fn write_tree(root: &Utf8Path, files: &BTreeMap<Utf8PathBuf, String>) {
    let dir = Dir::open_ambient_dir(root, ambient_authority()).expect("open temp dir");
    for (file, contents) in files {
        let path = Utf8Path::new("backend/src").join(file);
        if let Some(parent) = path.parent() {
            dir.create_dir_all(parent).expect("create module dirs");
        }
        dir.write(&path, contents).expect("write module");
    }
}

#[given("a backend tree where handlers reach the domain through StaffAccess ports")]
fn a_layered_tree(world: &World) {
    let files = LAYERED_TREE
        .iter()
        .map(|(file, contents)| (Utf8PathBuf::from(*file), (*contents).to_owned()))
        .collect();
    world.files.set(files);
}

#[given("{file} also imports {path}")]
fn also_imports(world: &World, file: String, path: String) {
    world.edit(&file, |contents| contents.push_str(&format!("\nuse {path};")));
}

#[given("{file} is truncated mid item")]
fn truncated(world: &World, file: String) {
    world.edit(&file, |contents| contents.push_str("\npub fn level( {"));
}

#[when("the architecture lint walks the tree")]
fn lint_walks_the_tree(world: &World) {
    let temp = TempDir::new().expect("temp dir");
    let root = Utf8Path::from_path(temp.path()).expect("utf-8 temp dir");
    write_tree(root, &world.files.get().unwrap_or_default());

    let outcome = match lint_backend_sources(&root.join("backend")) {
        Ok(()) => Outcome::Clean,
        Err(ArchitectureLintError::Violations(violations)) => Outcome::Broken(violations),
        Err(ArchitectureLintError::Parse { file, .. }) => Outcome::Unreadable(file),
        Err(ArchitectureLintError::Io(err)) => panic!("temp tree unreadable: {err}"),
    };
    world.outcome.set(outcome);
}

#[then("the tree passes the lint")]
fn the_tree_passes(world: &World) {
    let outcome = world.outcome.get().expect("lint should have run");
    assert!(matches!(outcome, Outcome::Clean), "got {outcome:?}");
}

#[then("{file} breaks the rule {rule}")]
fn breaks_the_rule(world: &World, file: String, rule: String) {
    let file = Utf8PathBuf::from(file);
    let violations = world.violations();
    assert!(
        violations.iter().any(|v| v.file == file && v.message.contains(rule.as_str())),
        "no `{rule}` violation in {file}: {violations:?}"
    );
}

#[then("{count} boundary is broken")]
fn one_boundary_is_broken(world: &World, count: usize) {
    assert_eq!(world.violations().len(), count);
}

#[then("{count} boundaries are broken")]
fn boundaries_are_broken(world: &World, count: usize) {
    assert_eq!(world.violations().len(), count);
}

#[then("the lint cannot read {file}")]
fn lint_cannot_read(world: &World, file: String) {
    match world.outcome.get().expect("lint should have run") {
        Outcome::Unreadable(unreadable) => assert_eq!(unreadable, Utf8PathBuf::from(file)),
        other => panic!("expected a parse failure, got {other:?}"),
    }
}

#[scenario(path = "tests/features/architecture_guardrails.feature")]
fn layer_boundaries(world: World) {
    let _ = world;
}
