//! End-to-end tests driving real files through `Pipeline`.

mod helpers;

use helpers::*;
use sheaf_bundler::{BuildMode, BuildTarget, Error, ProjectLayout};
use std::fs;

#[tokio::test]
async fn production_modules_are_minified_and_mirrored() {
    let project = create_forum_project();
    let root = project.path();
    let pipeline = forum_pipeline(root, BuildMode::Production);
    let layout = ProjectLayout::new(root);

    let report = pipeline.build_modules(false).await.expect("build modules");

    // alerts, helpers/format, panel, topic, single.js, tree/one, tree/nested/two
    assert_eq!(report.minified, 7);
    // vendor.min.js
    assert_eq!(report.linked, 1);

    let format = fs::read_to_string(layout.module_root_dest("modules").join("helpers/format.js"))
        .expect("minified module");
    assert!(!format.contains("function (value)"), "not minified: {}", format);

    let two = layout.vendor_dest("tree").join("nested/two.js");
    assert!(two.exists());
    assert!(!layout.vendor_dest("tree").join("README.md").exists());

    let linked = fs::read_to_string(layout.module_root_dest("modules").join("vendor.min.js"))
        .expect("linked module");
    assert_eq!(linked, "window.v=1;");
}

#[tokio::test]
async fn rebuilding_modules_drops_stale_output() {
    let project = create_forum_project();
    let root = project.path();
    let pipeline = forum_pipeline(root, BuildMode::Production);
    let layout = ProjectLayout::new(root);

    pipeline.build_modules(false).await.expect("first build");
    let stale = layout.module_root_dest("client").join("removed.js");
    fs::write(&stale, "stale").expect("write stale");

    let first = fs::read_to_string(layout.module_root_dest("admin").join("panel.js")).unwrap();
    pipeline.build_modules(false).await.expect("second build");
    let second = fs::read_to_string(layout.module_root_dest("admin").join("panel.js")).unwrap();

    assert!(!stale.exists());
    assert_eq!(first, second);
}

#[tokio::test]
async fn missing_module_root_fails_the_build() {
    let project = create_forum_project();
    let root = project.path();
    fs::remove_dir_all(root.join("public/src/client")).unwrap();

    let err = forum_pipeline(root, BuildMode::Production)
        .build_modules(false)
        .await
        .unwrap_err();
    assert!(matches!(err, Error::Enumerate { ref path, .. } if path.ends_with("public/src/client")));
}

#[cfg(unix)]
#[tokio::test]
async fn development_modules_are_links() {
    let project = create_forum_project();
    let root = project.path();
    let layout = ProjectLayout::new(root);

    let report = forum_pipeline(root, BuildMode::Development)
        .build_modules(true)
        .await
        .expect("dev build");
    assert_eq!(report.minified, 0);

    let admin = layout.module_root_dest("admin");
    assert!(fs::symlink_metadata(&admin).unwrap().file_type().is_symlink());
    assert!(admin.join("panel.js").exists());

    let single = layout.vendor_dest("single.js");
    assert!(fs::symlink_metadata(&single).unwrap().file_type().is_symlink());
    assert_eq!(
        fs::read_to_string(&single).unwrap(),
        "window.single = function (input) { return input * 2; };"
    );

    // Vendor links must not leak into the source tree
    assert!(!root.join("public/src/modules/single.js").exists());
}

#[tokio::test]
async fn client_bundle_order_in_production() {
    let project = create_forum_project();
    let root = project.path();
    let pipeline = forum_pipeline(root, BuildMode::Production);

    let report = pipeline
        .build_bundle(BuildTarget::Client, false)
        .await
        .expect("client bundle");

    assert_eq!(report.output, root.join("build/public/nodebb.min.js"));
    assert_eq!(report.plugin_scripts, 1);
    // A, B, C, P, optimizer artifact
    assert_eq!(report.files, 5);
    assert!(report.minified);

    let bundle = fs::read_to_string(&report.output).unwrap();
    let a = position(&bundle, "window.A");
    let b = position(&bundle, "window.B");
    let c = position(&bundle, "window.C");
    let p = position(&bundle, "window.P");
    assert!(a < b && b < c && c < p, "wrong order:\n{}", bundle);
    assert!(!bundle.contains("window.D"));
}

#[tokio::test]
async fn development_bundle_is_plain_concatenation() {
    let project = create_forum_project();
    let root = project.path();
    let pipeline = forum_pipeline(root, BuildMode::Development);

    let client = pipeline
        .build_bundle(BuildTarget::Client, false)
        .await
        .expect("client bundle");
    assert!(!client.minified);
    assert_eq!(
        fs::read_to_string(&client.output).unwrap(),
        "window.A = 1;\n;window.B = 2;\n;window.P = 5;\n;/* optimized shared-amd */\n"
    );

    let admin = pipeline
        .build_bundle(BuildTarget::Admin, false)
        .await
        .expect("admin bundle");
    assert_eq!(admin.output, root.join("build/public/acp.min.js"));
    assert_eq!(
        fs::read_to_string(&admin.output).unwrap(),
        "window.A = 1;\n;window.B = 2;\n;window.D = 4;\n;/* optimized shared-amd */\n/* optimized admin-amd */\n"
    );
}

#[tokio::test]
async fn both_bundles_build_concurrently() {
    let project = create_forum_project();
    let root = project.path();
    let pipeline = forum_pipeline(root, BuildMode::Production);

    let (client, admin) = tokio::try_join!(
        pipeline.build_bundle(BuildTarget::Client, false),
        pipeline.build_bundle(BuildTarget::Admin, false),
    )
    .expect("bundles");

    assert_ne!(client.output, admin.output);
    let artifact = fs::read_to_string(root.join("build/public/rjs-bundle-admin.js")).unwrap();
    assert!(artifact.contains("admin-amd"));
    let artifact = fs::read_to_string(root.join("build/public/rjs-bundle-client.js")).unwrap();
    assert!(!artifact.contains("admin-amd"));
}

#[tokio::test]
async fn statics_are_remounted() {
    let project = create_forum_project();
    let root = project.path();
    let layout = ProjectLayout::new(root);

    let stale = layout.statics_root().join("uninstalled/old.css");
    fs::create_dir_all(stale.parent().unwrap()).unwrap();
    fs::write(&stale, "").unwrap();

    let report = forum_pipeline(root, BuildMode::Production)
        .link_statics()
        .await
        .expect("statics");

    assert_eq!(report.mounts, 1);
    assert!(!layout.statics_root().join("uninstalled").exists());
    assert_eq!(
        fs::read_to_string(layout.statics_root().join("plugin/assets/logo.svg")).unwrap(),
        "<svg/>"
    );
}

#[tokio::test]
async fn kill_minifier_without_workers_is_a_no_op() {
    let project = create_forum_project();
    let pipeline = forum_pipeline(project.path(), BuildMode::Production);
    pipeline.kill_minifier();
    pipeline.kill_minifier();
}
