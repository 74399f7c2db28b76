use super::*;
use crate::timeline::{model::Clip, state::EditorState};

fn scratch(tag: &str) -> PathBuf {
    std::env::temp_dir().join(format!(
        "clipforge-lib-{tag}-{}/projects.json",
        std::process::id()
    ))
}

fn cleanup(path: &Path) {
    if let Some(dir) = path.parent() {
        std::fs::remove_dir_all(dir).ok();
    }
}

fn doc_with(text: &str) -> ProjectDocument {
    let mut s = EditorState::default();
    s.add_clip(Clip::text("c", text)).unwrap();
    ProjectDocument::from_state(&s)
}

#[test]
fn missing_file_is_empty() {
    let lib = ProjectLibrary::load_from(&scratch("missing"));
    assert!(lib.list().is_empty());
}

#[test]
fn corrupt_file_is_empty() {
    let path = scratch("corrupt");
    std::fs::create_dir_all(path.parent().unwrap()).unwrap();
    std::fs::write(&path, "[{oops").unwrap();
    assert!(ProjectLibrary::load_from(&path).list().is_empty());
    cleanup(&path);
}

#[test]
fn save_allocates_id_and_persists() {
    let path = scratch("save");
    let mut lib = ProjectLibrary::load_from(&path);
    let id = lib.save(None, &doc_with("one")).unwrap();
    assert!(id.starts_with("project-"));
    let second = lib.save(None, &doc_with("two")).unwrap();
    assert_ne!(id, second);

    let reloaded = ProjectLibrary::load_from(&path);
    assert_eq!(reloaded.list().len(), 2);
    let doc = reloaded.get(&id).unwrap().document().unwrap();
    assert_eq!(doc, doc_with("one"));
    cleanup(&path);
}

#[test]
fn save_with_existing_id_replaces_in_place() {
    let path = scratch("upsert");
    let mut lib = ProjectLibrary::load_from(&path);
    lib.save(Some("a"), &doc_with("old")).unwrap();
    lib.save(Some("b"), &doc_with("other")).unwrap();
    lib.save(Some("a"), &doc_with("new")).unwrap();

    let ids: Vec<&str> = lib.list().iter().map(|r| r.id.as_str()).collect();
    assert_eq!(ids, vec!["a", "b"]);
    assert_eq!(lib.get("a").unwrap().document().unwrap(), doc_with("new"));
    cleanup(&path);
}

#[test]
fn remove_persists() {
    let path = scratch("remove");
    let mut lib = ProjectLibrary::load_from(&path);
    lib.save(Some("a"), &doc_with("x")).unwrap();
    assert!(lib.remove("a").unwrap());
    assert!(!lib.remove("a").unwrap());
    assert!(ProjectLibrary::load_from(&path).list().is_empty());
    cleanup(&path);
}
