use std::rc::Rc;

use futures::executor::block_on;
use gallery_runtime::{
    gallery_view, AuthError, GalleryConfig, GalleryController, GalleryState, LikeCache, Overlay,
    SessionManager,
};
use platform_host::{
    unix_time_ms_now, HostServices, MemoryLocalStore, MemoryObjectStore, ScriptedDialogService,
    SelectedFile,
};
use pretty_assertions::assert_eq;

const CONFIG: &str = r#"
[storage]
bucket = "feed"
region = "eu-north-1"
"#;

struct Harness {
    local: MemoryLocalStore,
    objects: MemoryObjectStore,
    dialogs: ScriptedDialogService,
    sessions: SessionManager,
    gallery: GalleryController,
}

fn harness() -> Harness {
    let local = MemoryLocalStore::default();
    let objects = MemoryObjectStore::default();
    let dialogs = ScriptedDialogService::default();
    let host = HostServices::in_memory(local.clone(), objects.clone(), dialogs.clone());
    let config = GalleryConfig::from_toml_str(CONFIG).expect("config");
    Harness {
        sessions: SessionManager::new(Rc::new(local.clone())),
        gallery: GalleryController::with_state(
            host,
            GalleryState::with_likes(config, LikeCache::with_seed(2024)),
        ),
        local,
        objects,
        dialogs,
    }
}

#[test]
fn register_login_and_reject_wrong_password() {
    let mut h = harness();
    h.sessions
        .register("abc", "A@B.com ", "p1")
        .expect("register");
    h.sessions.logout().expect("logout");

    assert!(h.sessions.login("a@b.com", "p1").is_ok());
    h.sessions.logout().expect("logout");
    assert_eq!(
        h.sessions.login("a@b.com", "wrong"),
        Err(AuthError::InvalidCredentials)
    );
    assert_eq!(
        h.sessions.register("dup", "a@b.com", "p2"),
        Err(AuthError::DuplicateEmail)
    );
    assert_eq!(h.sessions.credentials().len(), 1);
}

#[test]
fn feed_is_locked_until_sign_in_and_survives_restart() {
    let mut h = harness();
    h.objects.insert_object("uploads/1_a.png", 1);
    block_on(h.gallery.refresh()).expect("refresh");

    let locked = gallery_view(h.gallery.state(), h.sessions.session());
    assert_eq!(locked.post_count, 0);
    assert!(locked.owner.is_none());

    h.sessions.register("abc", "a@b.com", "p1").expect("register");
    let open = gallery_view(h.gallery.state(), h.sessions.session());
    assert_eq!(open.post_count, 1);

    let mut restarted = SessionManager::new(Rc::new(h.local.clone()));
    assert!(restarted.restore().is_authenticated());
}

#[test]
fn upload_browse_like_and_delete() {
    let mut h = harness();
    h.sessions.register("abc", "a@b.com", "p1").expect("register");
    h.objects.insert_object("uploads/1000_first.jpg", 1_000);

    let started = unix_time_ms_now();
    block_on(async {
        h.gallery.refresh().await.expect("refresh");
        h.gallery.open_upload_dialog().await.expect("dialog");
        h.gallery
            .select_file(SelectedFile::new("second.jpg", "image/jpeg", vec![1, 2, 3]))
            .await
            .expect("select");
        h.gallery.upload().await.expect("upload");
    });

    let view = gallery_view(h.gallery.state(), h.sessions.session());
    assert_eq!(view.post_count, 2);
    assert!(view
        .items
        .windows(2)
        .all(|pair| {
            let a = h.gallery.state().object(&pair[0].key).expect("a");
            let b = h.gallery.state().object(&pair[1].key).expect("b");
            a.last_modified_unix_ms >= b.last_modified_unix_ms
        }));
    let newest = view.items[0].clone();
    assert_eq!(newest.caption, "second.jpg");
    let stamp: u64 = newest
        .display_name
        .split_once('_')
        .and_then(|(stamp, _)| stamp.parse().ok())
        .expect("timestamp prefix");
    assert!(stamp >= started);

    block_on(async {
        h.gallery.open_image_viewer("uploads/1000_first.jpg").await.expect("viewer");
        h.gallery.open_context_menu(&newest.key).await.expect("menu");
    });
    assert_eq!(h.gallery.state().overlay, Overlay::ContextMenu(newest.key.clone()));

    let seeded = h.gallery.state().likes.get(&newest.key).expect("seeded");
    block_on(async {
        h.gallery.toggle_like(&newest.key).await.expect("like");
        h.gallery.toggle_like(&newest.key).await.expect("unlike");
    });
    assert_eq!(h.gallery.state().likes.get(&newest.key), Some(seeded));

    h.dialogs.push_answer(true);
    block_on(h.gallery.remove(&newest.key)).expect("remove");
    assert_eq!(h.objects.keys(), vec!["uploads/1000_first.jpg".to_string()]);
    assert_eq!(h.gallery.state().snapshot.len(), 1);
    assert_eq!(
        h.dialogs.alerts(),
        vec!["Uploaded second.jpg.", "Deleted second.jpg."]
    );
}

#[test]
fn reset_all_locks_the_feed() {
    let mut h = harness();
    h.sessions.register("abc", "a@b.com", "p1").expect("register");
    h.sessions.reset_all().expect("reset");

    assert!(h.local.keys().is_empty());
    let view = gallery_view(h.gallery.state(), h.sessions.session());
    assert_eq!(view.owner, None);
}

#[test]
fn next_identity_does_not_inherit_previous_overlays() {
    let mut h = harness();
    h.sessions.register("abc", "a@b.com", "p1").expect("register");
    h.objects.insert_object("uploads/1_a.png", 1);
    block_on(async {
        h.gallery.refresh().await.expect("refresh");
        h.gallery
            .select_file(SelectedFile::new("b.png", "image/png", vec![1]))
            .await
            .expect("select");
        h.gallery.open_context_menu("uploads/1_a.png").await.expect("menu");
    });

    h.sessions.logout().expect("logout");
    block_on(h.gallery.end_session()).expect("end session");
    h.sessions.register("def", "d@e.com", "p2").expect("second user");

    let view = gallery_view(h.gallery.state(), h.sessions.session());
    assert_eq!(view.overlay, Overlay::None);
    assert_eq!(view.pending_file_name, None);
    assert_eq!(view.post_count, 1);
}
