use std::fs::File;

use simplelog::{Config, LevelFilter, WriteLogger};
use uitree::{ComponentId, ComponentSpec, Layout, Message, MessageKind, Tree};

/// Prints each pass instead of computing geometry.
struct PrintLayout {
    target: ComponentId,
}

impl Layout for PrintLayout {
    fn flow(&mut self, tree: &Tree) {
        println!("flow   {} ({} children)", label(tree, self.target), tree.get_children(self.target).len());
    }

    fn reflow(&mut self, tree: &Tree) {
        println!("reflow {}", label(tree, self.target));
    }
}

fn label(tree: &Tree, id: ComponentId) -> String {
    tree.get(id)
        .and_then(|c| c.name())
        .map(|name| format!("{name} [{id}]"))
        .unwrap_or_else(|| id.to_string())
}

fn print_tree(tree: &Tree, id: ComponentId, depth: usize) {
    println!("{:indent$}{}", "", label(tree, id), indent = depth * 2);
    for &child in tree.get_children(id) {
        print_tree(tree, child, depth + 1);
    }
}

fn main() -> std::io::Result<()> {
    let log_file = File::create("resize.log")?;
    WriteLogger::init(LevelFilter::Trace, Config::default(), log_file)
        .expect("Failed to initialize logger");

    let mut tree = Tree::new();
    tree.register_layout("print", |target| Box::new(PrintLayout { target }));

    // A panel whose client area receives its children
    let panel = tree
        .create(
            ComponentSpec::named("panel")
                .layout_kind("print")
                .chrome(ComponentSpec::named("header").layout_kind("print"))
                .chrome(ComponentSpec::named("client").layout_kind("print"))
                .child(ComponentSpec::named("body").layout_kind("print"))
                .child(
                    ComponentSpec::named("footer")
                        .layout_kind("print")
                        .handler(MessageKind::custom("status"), |tree, id, message| {
                            let text = message.payload::<&str>().copied().unwrap_or("");
                            println!("status {} -> {}", label(tree, id), text);
                        }),
                ),
        )
        .expect("Failed to create panel");

    println!("-- structure");
    print_tree(&tree, panel, 0);

    println!("-- render");
    tree.render(panel).expect("Failed to render panel");

    println!("-- resize");
    tree.broadcast_to_ownerless(&Message::resize());

    println!("-- status");
    tree.broadcast_message(panel, &Message::custom("status").with_payload("ready"));

    tree.destroy(panel).expect("Failed to destroy panel");
    println!("-- destroyed, {} component(s) left", tree.len());
    Ok(())
}
