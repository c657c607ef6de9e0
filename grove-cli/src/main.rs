mod render;

use std::fs::File;
use std::sync::Arc;

use grove::prelude::*;
use log::info;
use simplelog::{Config, LevelFilter, WriteLogger};

fn sample_items() -> StaticItems {
    StaticItems::from_items([
        TreeItem::folder("root", ["src", "tests", "Cargo.toml"]).with_data("grove"),
        TreeItem::folder("src", ["src/lib.rs", "src/linear.rs", "src/focus"]).with_data("src"),
        TreeItem::leaf("src/lib.rs").with_data("lib.rs"),
        TreeItem::leaf("src/linear.rs").with_data("linear.rs"),
        TreeItem::folder("src/focus", ["src/focus/mod.rs"]).with_data("focus"),
        TreeItem::leaf("src/focus/mod.rs").with_data("mod.rs"),
        TreeItem::folder("tests", ["tests/driver.rs"]).with_data("tests"),
        TreeItem::leaf("tests/driver.rs").with_data("driver.rs"),
        TreeItem::leaf("Cargo.toml").with_data("Cargo.toml"),
    ])
}

fn load_items(path: Option<String>) -> StaticItems {
    let Some(path) = path else {
        return sample_items();
    };
    let file = File::open(&path).expect("Failed to open item file");
    serde_json::from_reader(file).expect("Failed to parse item file")
}

fn print_tree(env: &TreeEnvironment<StaticItems, Arc<MemorySurface>>, tree: &TreeId, title: &str) {
    let rows = env.linear_items(tree).unwrap_or_else(|| Arc::from(Vec::new()));
    let text = env.items().read(|items| render::outline(&rows, items));
    println!("== {} ==\n{}", title, text);
}

/// Mount the current rows on the surface, the way a renderer would.
fn mount(env: &TreeEnvironment<StaticItems, Arc<MemorySurface>>, tree: &TreeId) {
    let rows = env.linear_items(tree).unwrap_or_else(|| Arc::from(Vec::new()));
    env.surface()
        .mount_tree(tree.clone(), rows.iter().map(|r| r.item.clone()));
    let focused = env.view_state().read(|v| v.focused_item(tree).cloned());
    env.surface()
        .set_focus_target(tree, focused.or_else(|| rows.first().map(|r| r.item.clone())));
}

// Events and the recompute driver share one thread, so each burst below
// settles in a single pass.
#[tokio::main(flavor = "current_thread")]
async fn main() {
    let log_file = File::create("grove-cli.log").expect("Failed to create log file");
    WriteLogger::init(LevelFilter::Debug, Config::default(), log_file)
        .expect("Failed to initialize logger");

    let items = load_items(std::env::args().nth(1));
    let root = ItemId::from("root");
    let tree = TreeId::from("files");

    let surface = Arc::new(MemorySurface::new());
    let env = TreeEnvironment::managed(items, ViewState::default(), Arc::clone(&surface)).build();
    let mut generation = env.subscribe();
    let driver = env.driver().spawn();

    env.register_tree(TreeConfig::new(tree.clone(), root).label("Files").render_root(true));
    generation.changed().await.expect("Driver stopped");
    print_tree(&env, &tree, "collapsed");

    env.on_expand_item(&"src".into(), &tree);
    env.on_expand_item(&"src/focus".into(), &tree);
    env.on_expand_item(&"tests".into(), &tree);
    generation.changed().await.expect("Driver stopped");
    print_tree(&env, &tree, "expanded");

    mount(&env, &tree);
    env.set_active_tree(Some(tree.clone()), true);
    env.on_focus_item(&"src/linear.rs".into(), &tree);
    for call in surface.take_calls() {
        println!("surface: {:?}", call);
    }

    env.on_drop(
        &[ItemId::from("Cargo.toml")],
        &DropTarget::Between {
            tree_id: tree.clone(),
            parent_item: "src".into(),
            child_index: 0,
            depth: 1,
            linear_index: 2,
        },
    );
    generation.changed().await.expect("Driver stopped");
    print_tree(&env, &tree, "after drop");

    info!("Completed {} recompute passes", env.generation());
    if let Err(e) = driver.shutdown().await {
        eprintln!("Error: {}", e);
    }
}
