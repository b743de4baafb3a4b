//! End-to-end: definitions directory → ordering → recorded plans.

use std::fs;

use tabledef_adapters::{
    FsDefinitionSource, MemoryDefinitionSource, MigrationPlanRecorder, SeedPlanRecorder,
};
use tabledef_core::prelude::*;
use tempfile::TempDir;

fn write(root: &std::path::Path, rel: &str, text: &str) {
    let path = root.join(rel);
    fs::create_dir_all(path.parent().unwrap()).unwrap();
    fs::write(path, text).unwrap();
}

fn blog_dir() -> TempDir {
    let temp = TempDir::new().unwrap();
    let root = temp.path();
    write(
        root,
        "tables/users.td",
        "RECORDS: 10
         COLUMNS:
            id, null, false, null, id;
            email, email, true, safeEmail, string, unique;",
    );
    write(
        root,
        "tables/posts.td",
        "FOREIGN_KEYS: ('user_id', 'id', 'users', onDelete: cascade)
         COLUMNS:
            id, null, false, null, id;
            user_id, null, false, null, foreignId;
            [*stamps,base*]title, title, true, sentence, string;",
    );
    write(
        root,
        "tables/stamps.td",
        "[*BASE*] COLUMNS: published_at, null, false, null, timestamp, nullable;",
    );
    write(root, "tables/roles.td", "RECORDS: 3 COLUMNS: id, null, false, null, id;");
    write(
        root,
        "pivots/role_user.td",
        "HAS_TIMESTAMPS: false
         FOREIGN_KEYS: ('role_id', 'id', 'roles'), ('user_id', 'id', 'users')
         COLUMNS: [*PRIMARY*]role_id, null, foreignId; [*PRIMARY*]user_id, null, foreignId;",
    );
    temp
}

#[test]
fn plan_all_from_directory() {
    let temp = blog_dir();
    let service = PlanService::new(OrderingService::new(Box::new(FsDefinitionSource::new(
        temp.path(),
    ))));
    let recorder = MigrationPlanRecorder::new();

    let report = service.plan_all(&[], &recorder).unwrap();
    assert!(report.skipped.is_empty(), "base table must not be reported");

    let plan = recorder.plan().unwrap();
    let names = plan.table_names();
    assert_eq!(names.last(), Some(&"role_user"));
    let pos = |n: &str| names.iter().position(|x| *x == n).unwrap();
    assert!(pos("users") < pos("posts"));
    assert!(!names.contains(&"stamps"));

    let text = plan.render();
    assert!(text.contains("$table->timestamp('published_at')->nullable();"));
    assert!(text.contains("->on('users')->onDelete('cascade');"));
}

#[test]
fn seed_plan_uses_record_counts() {
    let temp = blog_dir();
    let service = SeedService::new(OrderingService::new(Box::new(FsDefinitionSource::new(
        temp.path(),
    ))));
    let recorder = SeedPlanRecorder::new();

    service.seed(&SeedRequest::default(), &recorder).unwrap();

    let plan = recorder.plan().unwrap();
    assert_eq!(plan.entry("users").unwrap().count, 10);
    assert_eq!(plan.entry("roles").unwrap().count, 3);
    assert_eq!(plan.entry("role_user").unwrap().count, 30);
}

#[test]
fn memory_and_directory_sources_agree() {
    let temp = blog_dir();
    let fs_source = FsDefinitionSource::new(temp.path());

    let memory = MemoryDefinitionSource::new();
    for table_type in [TableType::Table, TableType::Pivot] {
        for name in fs_source.list(table_type).unwrap() {
            let text = fs_source.read(table_type, &name).unwrap().unwrap();
            memory.insert(table_type, name, text).unwrap();
        }
    }

    let names = ["role_user", "posts", "roles", "users"];
    let from_disk = OrderingService::new(Box::new(fs_source)).order(&names).unwrap();
    let from_memory = OrderingService::new(Box::new(memory)).order(&names).unwrap();
    assert_eq!(from_disk.names(), from_memory.names());
    assert_eq!(from_disk.tables, from_memory.tables);
}
