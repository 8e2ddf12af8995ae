//! Hooks - per-component persistent state
//!
//! A component is a render function `FnMut(&mut Scope) -> Node`. Each
//! mounted component gets a hook table; hook calls claim its slots in call
//! order, so a `use_state` signal survives re-renders while a plain local
//! does not.
//!
//! - [`Scope::use_state`] / [`Scope::use_memo`] / [`Scope::use_ref`] - persistent values
//! - [`Scope::use_effect`] - side effects with cleanup
//! - [`Scope::provide_context`] / [`Scope::use_context`] - subtree-scoped values
//! - [`Scope::use_input`] / [`Scope::use_app`] - app services
//! - [`Scope::child`] - mount a child component

mod instance;
mod scope;
mod slots;

pub use instance::RenderFn;
pub use scope::Scope;

pub(crate) use instance::{ComponentInstance, ContextMap};

#[cfg(test)]
mod tests {
    use super::*;
    use std::cell::RefCell;
    use std::rc::Rc;

    use crate::error::Error;
    use crate::primitives::{Node, fragment, plain};
    use crate::reactive::{Cleanup, Runtime, Signal};

    fn mount(rt: &Runtime, render: impl FnMut(&mut Scope) -> Node + 'static) -> Rc<ComponentInstance> {
        ComponentInstance::mount(rt, "Test", None, ContextMap::new(), Box::new(render))
            .expect("first render")
    }

    fn text_of(node: &Node) -> String {
        match node {
            Node::Text(t) => t.content.clone(),
            Node::Fragment(children) => children.iter().map(text_of).collect::<Vec<_>>().join("|"),
            Node::Component(c) => text_of(&c.output()),
            other => format!("{other:?}"),
        }
    }

    #[test]
    fn test_state_persists_across_renders() {
        let rt = Runtime::new();
        let handle: Rc<RefCell<Option<Signal<i32>>>> = Rc::default();
        let renders = Rc::new(RefCell::new(0));

        let (h, r) = (handle.clone(), renders.clone());
        let instance = mount(&rt, move |cx| {
            *r.borrow_mut() += 1;
            let count = cx.use_state(|| 0);
            let local = 0;
            *h.borrow_mut() = Some(count.clone());
            plain(format!("{} {}", count.get(), local))
        });
        assert_eq!(text_of(&instance.output()), "0 0");

        let count = handle.borrow().clone().unwrap();
        count.update(|n| n + 1);
        count.update(|n| n + 1);
        assert_eq!(text_of(&instance.output()), "2 0");
        assert_eq!(*renders.borrow(), 3);
        assert_eq!(instance.table.borrow().len(), 1);
    }

    #[test]
    fn test_conditional_hook_is_reported() {
        let rt = Runtime::new();
        let flag = rt.create_signal(false);

        let f = flag.clone();
        let _instance = mount(&rt, move |cx| {
            if f.get() {
                cx.use_state(|| 1);
            }
            cx.use_ref(|| "r");
            Node::empty()
        });

        let err = rt.batch(|| flag.set(true)).unwrap_err();
        match err {
            Error::HookKindMismatch { component, index, .. } => {
                assert_eq!(component, "Test");
                assert_eq!(index, 0);
            }
            other => panic!("expected kind mismatch, got {other:?}"),
        }
    }

    #[test]
    fn test_failed_render_leaves_no_nodes_behind() {
        let rt = Runtime::new();
        let flag = rt.create_signal(false);

        let f = flag.clone();
        let _instance = mount(&rt, move |cx| {
            if f.get() {
                cx.use_state(|| 0i32);
            } else {
                cx.use_ref(|| 0i32);
            }
            let base = cx.use_state(|| 1i32);
            let b = base.clone();
            let doubled = cx.use_memo(move || b.get() * 2);
            plain(format!("{}", base.get() + doubled.get()))
        });
        let mounted = rt.node_count();

        assert!(rt.batch(|| flag.set(true)).is_err());
        assert_eq!(rt.node_count(), mounted);
        assert!(rt.batch(|| flag.replace(true)).is_err());
        assert_eq!(rt.node_count(), mounted);
    }

    #[test]
    fn test_dropped_hook_is_reported() {
        let rt = Runtime::new();
        let flag = rt.create_signal(true);

        let f = flag.clone();
        let _instance = mount(&rt, move |cx| {
            cx.use_ref(|| 0u8);
            if f.get() {
                cx.use_ref(|| 1u8);
            }
            Node::empty()
        });

        let err = rt.batch(|| flag.set(false)).unwrap_err();
        assert!(matches!(err, Error::HookCountMismatch { expected: 2, found: 1, .. }));
    }

    #[test]
    fn test_nested_context_shadows_outer() {
        let rt = Runtime::new();
        let seen = Rc::new(RefCell::new(Vec::new()));

        let s = seen.clone();
        let _root = mount(&rt, move |cx| {
            cx.provide_context(1u32);
            let (s1, s2) = (s.clone(), s.clone());
            let inner = cx.child("Inner", move |cx| {
                cx.provide_context(2u32);
                let s = s1.clone();
                cx.child("Leaf", move |cx| {
                    s.borrow_mut().push(("leaf", cx.use_context::<u32>()));
                    Node::empty()
                })
            });
            let sibling = cx.child("Sibling", move |cx| {
                s2.borrow_mut().push(("sibling", cx.use_context::<u32>()));
                s2.borrow_mut().push(("missing", cx.use_context::<i64>().map(|v| v as u32)));
                Node::empty()
            });
            fragment(vec![inner, sibling])
        });

        assert_eq!(
            *seen.borrow(),
            vec![("leaf", Some(2)), ("sibling", Some(1)), ("missing", None)]
        );
    }

    #[test]
    fn test_unmount_runs_cleanups_in_reverse_once() {
        let rt = Runtime::new();
        let log = Rc::new(RefCell::new(Vec::new()));

        let l = log.clone();
        let instance = mount(&rt, move |cx| {
            for name in ["first", "second"] {
                let l = l.clone();
                cx.use_effect(move || {
                    let l = l.clone();
                    Some(Box::new(move || l.borrow_mut().push(name)) as Cleanup)
                });
            }
            let l = l.clone();
            cx.child("Child", move |cx| {
                let l = l.clone();
                cx.use_effect(move || {
                    let l = l.clone();
                    Some(Box::new(move || l.borrow_mut().push("child")) as Cleanup)
                });
                Node::empty()
            })
        });
        let nodes_while_mounted = rt.node_count();
        assert!(nodes_while_mounted > 0);

        instance.unmount();
        instance.unmount();
        assert_eq!(*log.borrow(), vec!["child", "second", "first"]);
        assert_eq!(rt.node_count(), 0);
    }

    #[test]
    fn test_effect_cleanup_runs_before_rerun() {
        let rt = Runtime::new();
        let source = rt.create_signal(0);
        let log = Rc::new(RefCell::new(Vec::new()));

        let (s, l) = (source.clone(), log.clone());
        let instance = mount(&rt, move |cx| {
            let (s, l) = (s.clone(), l.clone());
            cx.use_effect(move || {
                let v = s.get();
                l.borrow_mut().push(format!("run {v}"));
                let l = l.clone();
                Some(Box::new(move || l.borrow_mut().push(format!("clean {v}"))) as Cleanup)
            });
            Node::empty()
        });

        source.set(1);
        instance.unmount();
        assert_eq!(*log.borrow(), vec!["run 0", "clean 0", "run 1", "clean 1"]);
    }

    #[test]
    fn test_use_input_without_app_is_missing_context() {
        let rt = Runtime::new();
        let result = ComponentInstance::mount(
            &rt,
            "Lonely",
            None,
            ContextMap::new(),
            Box::new(|cx: &mut Scope| {
                cx.use_input(|_| {});
                Node::empty()
            }),
        );
        assert!(matches!(result, Err(Error::MissingContext { .. })));
        assert_eq!(rt.node_count(), 0);
    }
}
