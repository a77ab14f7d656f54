//! The forum's built-in script lists.

use super::{Manifest, VendorModuleEntry};
use std::path::PathBuf;

const BASE: &[&str] = &[
    "node_modules/promise-polyfill/dist/polyfill.js",
    "node_modules/socket.io-client/dist/socket.io.js",
    "node_modules/requirejs/require.js",
    "public/src/require-config.js",
    "node_modules/jquery/dist/jquery.js",
    "node_modules/textcomplete/dist/textcomplete.min.js",
    "node_modules/textcomplete.contenteditable/dist/textcomplete.codemirror.min.js",
    "node_modules/visibilityjs/lib/visibility.core.js",
    "node_modules/bootstrap/dist/js/bootstrap.js",
    "node_modules/@adactive/bootstrap-tagsinput/src/bootstrap-tagsinput.js",
    "node_modules/benchpressjs/build/benchpress.js",
    "node_modules/jquery-serializeobject/jquery.serializeObject.js",
    "public/vendor/bootbox/wrapper.js",
    // TODO: drop xregexp from the base list once everything loads it through require
    "public/vendor/xregexp/xregexp.js",
    "public/vendor/xregexp/unicode/unicode-base.js",
    "public/src/utils.js",
    "public/src/sockets.js",
    "public/src/app.js",
    "public/src/ajaxify.js",
    "public/src/overrides.js",
    "public/src/widgets.js",
];

// Client-only modules bundled to cut requests on a cold load.
const CLIENT: &[&str] = &[
    "public/src/client/header/chat.js",
    "public/src/client/header/notifications.js",
    "public/src/client/infinitescroll.js",
    "public/src/client/pagination.js",
    "public/src/client/recent.js",
    "public/src/client/unread.js",
    "public/src/client/topic.js",
    "public/src/client/topic/events.js",
    "public/src/client/topic/posts.js",
    "public/src/client/topic/images.js",
    "public/src/client/topic/votes.js",
    "public/src/client/topic/postTools.js",
    "public/src/client/topic/threadTools.js",
    "public/src/client/categories.js",
    "public/src/client/category.js",
    "public/src/client/category/tools.js",
    "public/src/modules/translator.js",
    "public/src/modules/components.js",
    "public/src/modules/sort.js",
    "public/src/modules/navigator.js",
    "public/src/modules/topicSelect.js",
    "public/src/modules/topicList.js",
    "public/src/modules/categoryFilter.js",
    "public/src/modules/categorySelector.js",
    "public/src/modules/categorySearch.js",
    "public/src/modules/share.js",
    "public/src/modules/alerts.js",
    "public/src/modules/taskbar.js",
    "public/src/modules/helpers.js",
    "public/src/modules/storage.js",
    "public/src/modules/handleBack.js",
];

const ADMIN: &[&str] = &[
    "node_modules/material-design-lite/material.js",
    "public/src/admin/admin.js",
    "node_modules/jquery-deserialize/src/jquery.deserialize.js",
];

const VENDOR_MODULES: &[(&str, &str)] = &[
    ("Chart.js", "node_modules/chart.js/dist/Chart.min.js"),
    ("mousetrap.js", "node_modules/mousetrap/mousetrap.min.js"),
    ("cropper.js", "node_modules/cropperjs/dist/cropper.min.js"),
    ("jquery-ui", "node_modules/jquery-ui/ui"),
    ("zxcvbn.js", "node_modules/zxcvbn/dist/zxcvbn.js"),
    ("ace", "node_modules/ace-builds/src-min"),
    ("clipboard.js", "node_modules/clipboard/dist/clipboard.min.js"),
    ("tinycon.js", "node_modules/tinycon/tinycon.js"),
    ("slideout.js", "node_modules/slideout/dist/slideout.min.js"),
    ("compare-versions.js", "node_modules/compare-versions/index.js"),
    ("timeago/locales", "node_modules/timeago/locales"),
    ("jquery-form.js", "node_modules/jquery-form/dist/jquery.form.min.js"),
    ("xregexp.js", "node_modules/xregexp/xregexp-all.js"),
];

fn paths(list: &[&str]) -> Vec<PathBuf> {
    list.iter().map(PathBuf::from).collect()
}

pub(super) fn builtin() -> Manifest {
    Manifest::new(
        paths(BASE),
        paths(CLIENT),
        paths(ADMIN),
        VENDOR_MODULES
            .iter()
            .map(|(name, path)| VendorModuleEntry::new(*name, *path))
            .collect(),
    )
}
