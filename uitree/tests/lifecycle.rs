use std::cell::RefCell;
use std::rc::Rc;

use uitree::{ComponentId, ComponentSpec, Layout, Tree, TreeError};

type Log = Rc<RefCell<Vec<String>>>;

fn logging(log: Log, name: &'static str) -> impl FnOnce(&Tree, ComponentId) + 'static {
    move |_tree, _id| log.borrow_mut().push(name.to_string())
}

/// Layout that records the state of its target when it is released.
struct TeardownProbe {
    target: ComponentId,
    seen: Rc<RefCell<Option<(usize, usize, Option<ComponentId>)>>>,
}

impl Layout for TeardownProbe {
    fn destroy(&mut self, tree: &Tree) {
        let target = tree.get(self.target).unwrap();
        *self.seen.borrow_mut() = Some((
            target.controls().len(),
            target.children().len(),
            target.container(),
        ));
    }
}

// ============================================================================
// Creation
// ============================================================================

#[test]
fn test_creation_order() {
    let mut tree = Tree::new();
    let x = tree
        .create(
            ComponentSpec::new()
                .chrome(ComponentSpec::named("client"))
                .children([ComponentSpec::named("a"), ComponentSpec::named("b")]),
        )
        .unwrap();
    let client = tree.find_named(x, "client").unwrap();
    let a = tree.find_named(x, "a").unwrap();
    let b = tree.find_named(x, "b").unwrap();

    assert!(tree.get(client).unwrap().is_chrome());
    assert!(!tree.get(a).unwrap().is_chrome());
    assert_eq!(tree.get(x).unwrap().owned(), &[client, a, b]);
    assert_eq!(tree.get_controls(x), &[client, a, b]);
    assert_eq!(tree.get_children(client), &[a, b]);
}

#[test]
fn test_ownerless_registered_with_master() {
    let mut tree = Tree::new();
    let id = tree.create(ComponentSpec::new()).unwrap();
    let master = tree.master();

    assert_eq!(tree.get(id).unwrap().owner(), Some(master));
    assert!(tree.get(master).unwrap().owned().contains(&id));
    assert_eq!(tree.get(master).unwrap().name(), Some("master"));
}

#[test]
fn test_explicit_owner() {
    let mut tree = Tree::new();
    let owner = tree.create(ComponentSpec::new()).unwrap();
    let id = tree
        .create(ComponentSpec::named("part").owner(owner))
        .unwrap();

    assert_eq!(tree.find_named(owner, "part"), Some(id));
    assert_eq!(tree.get(id).unwrap().container(), None);
    assert!(!tree.get(tree.master()).unwrap().owned().contains(&id));
}

#[test]
fn test_invalid_spec_creates_nothing() {
    let mut tree = Tree::new();
    let gone = tree.create(ComponentSpec::new()).unwrap();
    tree.destroy(gone).unwrap();
    let before = tree.len();

    let result = tree.create(
        ComponentSpec::new()
            .child(ComponentSpec::new())
            .child(ComponentSpec::new().container(gone)),
    );

    assert_eq!(result, Err(TreeError::UnknownComponent(gone)));
    assert_eq!(tree.len(), before);
}

// ============================================================================
// Destruction
// ============================================================================

#[test]
fn test_destroy_is_two_phase() {
    let log: Log = Rc::default();
    let seen = Rc::new(RefCell::new(None));
    let mut tree = Tree::new();
    let s = seen.clone();
    tree.register_layout("probe", move |target| {
        Box::new(TeardownProbe {
            target,
            seen: s.clone(),
        })
    });

    let x = tree
        .create(
            ComponentSpec::new()
                .layout_kind("probe")
                .on_destroy(logging(log.clone(), "x")),
        )
        .unwrap();
    let b = tree
        .create(
            ComponentSpec::new()
                .as_chrome()
                .container(x)
                .on_destroy(logging(log.clone(), "b")),
        )
        .unwrap();
    let l = log.clone();
    let a = tree
        .create(
            ComponentSpec::new()
                .container(x)
                .on_destroy(move |tree, _id| {
                    // Chrome is still intact during client teardown
                    assert!(tree.contains(b));
                    l.borrow_mut().push("a".to_string());
                }),
        )
        .unwrap();
    assert_eq!(tree.get_controls(x), &[b, a]);

    tree.destroy(x).unwrap();

    assert_eq!(*log.borrow(), vec!["x", "a", "b"]);
    assert_eq!(*seen.borrow(), Some((0, 0, None)));
    assert!(!tree.contains(x));
    assert!(!tree.contains(a));
    assert!(!tree.contains(b));
}

#[test]
fn test_destroy_detaches_from_container() {
    let mut tree = Tree::new();
    let p = tree.create(ComponentSpec::new()).unwrap();
    let keep = tree.create(ComponentSpec::new().container(p)).unwrap();
    let x = tree.create(ComponentSpec::new().container(p)).unwrap();

    tree.destroy(x).unwrap();

    assert_eq!(tree.get_controls(p), &[keep]);
    assert_eq!(tree.get_children(p), &[keep]);
    assert!(tree.get(x).is_none());
}

#[test]
fn test_destroy_unregisters_from_owner() {
    let mut tree = Tree::new();
    let x = tree.create(ComponentSpec::new()).unwrap();
    let master = tree.master();

    tree.destroy(x).unwrap();

    assert!(!tree.get(master).unwrap().owned().contains(&x));
}

#[test]
fn test_destroy_redirected_children() {
    let mut tree = Tree::new();
    let x = tree
        .create(ComponentSpec::new().chrome(ComponentSpec::named("client")))
        .unwrap();
    let client = tree.find_named(x, "client").unwrap();
    let c = tree.create(ComponentSpec::new().container(x)).unwrap();
    let before = tree.len();

    tree.destroy(x).unwrap();

    assert!(!tree.contains(c));
    assert!(!tree.contains(client));
    assert_eq!(tree.len(), before - 3);
}

#[test]
fn test_destroy_owned_outside_containment() {
    let mut tree = Tree::new();
    let owner = tree.create(ComponentSpec::new()).unwrap();
    let elsewhere = tree.create(ComponentSpec::new()).unwrap();
    let floating = tree
        .create(ComponentSpec::new().owner(owner).container(elsewhere))
        .unwrap();

    tree.destroy(owner).unwrap();

    assert!(!tree.contains(floating));
    assert!(tree.get_controls(elsewhere).is_empty());
}

#[test]
fn test_destroy_foreign_child_is_detached() {
    let mut tree = Tree::new();
    let host = tree.create(ComponentSpec::new()).unwrap();
    let x = tree.create(ComponentSpec::new()).unwrap();
    let target = tree.create(ComponentSpec::new().container(host)).unwrap();
    tree.set_control_parent(x, Some(target)).unwrap();
    let c = tree.create(ComponentSpec::new().container(x)).unwrap();
    assert_eq!(tree.get(c).unwrap().parent(), Some(target));

    tree.destroy(target).unwrap();

    // c belongs to x, so it survives, but loses its structural parent
    assert!(tree.contains(c));
    assert_eq!(tree.get(c).unwrap().parent(), None);
    assert_eq!(tree.get(c).unwrap().container(), Some(x));
    assert_eq!(tree.get(x).unwrap().control_parent(), None);
}

#[test]
fn test_destroyed_control_parent_is_cleared() {
    let mut tree = Tree::new();
    let x = tree
        .create(ComponentSpec::new().chrome(ComponentSpec::named("client")))
        .unwrap();
    let client = tree.find_named(x, "client").unwrap();

    tree.destroy(client).unwrap();
    let c = tree.create(ComponentSpec::new().container(x)).unwrap();

    assert_eq!(tree.get(x).unwrap().control_parent(), None);
    assert_eq!(tree.get(c).unwrap().parent(), Some(x));
    assert_eq!(tree.find_named(x, "client"), None);
}

#[test]
fn test_destroy_client_controls_keeps_chrome() {
    let mut tree = Tree::new();
    let x = tree.create(ComponentSpec::new()).unwrap();
    let a = tree.create(ComponentSpec::new().container(x)).unwrap();
    let b = tree
        .create(ComponentSpec::new().as_chrome().container(x))
        .unwrap();
    let c = tree.create(ComponentSpec::new().container(x)).unwrap();

    tree.destroy_client_controls(x);

    assert_eq!(tree.get_controls(x), &[b]);
    assert!(!tree.contains(a));
    assert!(!tree.contains(c));
}

#[test]
fn test_destroy_twice() {
    let mut tree = Tree::new();
    let x = tree.create(ComponentSpec::new()).unwrap();

    assert_eq!(tree.destroy(x), Ok(()));
    assert_eq!(tree.destroy(x), Err(TreeError::UnknownComponent(x)));
}

#[test]
fn test_master_cannot_be_destroyed() {
    let mut tree = Tree::new();
    let master = tree.master();

    assert_eq!(tree.destroy(master), Err(TreeError::DefaultOwner));
    assert!(tree.contains(master));
}
