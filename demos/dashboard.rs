//! Dashboard Example - nested components, flex rows and mouse input
//!
//! A header row, a list of panels that grow to share the width, and a
//! status line. Click a panel to select it, scroll over the list to move
//! the selection, Tab cycles, `q` quits.
//!
//! Run with: cargo run --example dashboard

use std::rc::Rc;

use ember_tui::prelude::*;
use ember_tui::ColorValue;

const PANELS: [&str; 3] = ["cpu", "memory", "network"];

fn header(cx: &mut Scope) -> Node {
    let app = cx.use_app();
    let viewport = app.viewport();
    box_primitive(
        BoxProps {
            flex_direction: FlexDirection::Row,
            background_color: Some(ColorValue::from("blue")),
            ..Default::default()
        },
        vec![
            text(
                TextProps {
                    bold: true,
                    ..Default::default()
                },
                " ember dashboard",
            ),
            spacer(),
            plain(format!("{}x{} ", viewport.width, viewport.height.unwrap_or(0))),
        ],
    )
}

fn panel(name: &str, selected: bool, on_click: Rc<dyn Fn(&MouseEvent)>) -> Node {
    box_primitive(
        BoxProps {
            flex_grow: 1.0,
            border_style: if selected {
                BorderStyle::Double
            } else {
                BorderStyle::Single
            },
            border_color: selected.then(|| ColorValue::from("yellow")),
            align_items: AlignItems::Center,
            on_click: Some(on_click),
            ..Default::default()
        },
        vec![
            text(
                TextProps {
                    bold: selected,
                    ..Default::default()
                },
                name.to_string(),
            ),
            show(selected, || plain("selected"), None),
        ],
    )
}

fn dashboard(cx: &mut Scope) -> Node {
    let app = cx.use_app();
    let selected = cx.use_state(|| 0usize);
    let clicks = cx.use_state(|| 0u32);

    let s = selected.clone();
    cx.use_input(move |event| {
        if event.key.tab {
            s.update(|i| (i + 1) % PANELS.len());
        } else if event.input == "q" {
            app.exit();
        }
    });

    let status = {
        let (s, c) = (selected.clone(), clicks.clone());
        cx.use_memo(move || format!("{} selected, {} clicks", PANELS[s.get()], c.get()))
    };

    let current = selected.get();
    let panels = each(PANELS, |i, name| {
        let (s, c) = (selected.clone(), clicks.clone());
        let on_click: Rc<dyn Fn(&MouseEvent)> = Rc::new(move |_| {
            s.set(i);
            c.update(|n| n + 1);
        });
        panel(name, i == current, on_click)
    });

    let s = selected.clone();
    let on_scroll: Rc<dyn Fn(&MouseEvent)> = Rc::new(move |event| {
        let step = if event.button == ember_tui::state::MouseButton::ScrollUp {
            PANELS.len() - 1
        } else {
            1
        };
        s.update(|i| (i + step) % PANELS.len());
    });

    let header = cx.child("Header", header);
    box_primitive(
        BoxProps::default(),
        vec![
            header,
            box_primitive(
                BoxProps {
                    flex_direction: FlexDirection::Row,
                    gap: 1,
                    on_scroll: Some(on_scroll),
                    ..Default::default()
                },
                vec![panels],
            ),
            newline(1),
            text(
                TextProps {
                    dim: true,
                    ..Default::default()
                },
                status.get(),
            ),
        ],
    )
}

fn main() -> ember_tui::Result<()> {
    render(dashboard, AppConfig::default())?.wait_until_exit()
}
