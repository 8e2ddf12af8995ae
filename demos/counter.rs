//! Counter Example - state, input and a re-rendering text node
//!
//! Up/Down change the count, `r` resets it, `q` or Ctrl+C quits. Only the
//! cells whose digits change are written on each key press.
//!
//! Run with: cargo run --example counter

use ember_tui::prelude::*;
use ember_tui::ColorValue;

fn counter(cx: &mut Scope) -> Node {
    let app = cx.use_app();
    let count = cx.use_state(|| 0i64);

    let c = count.clone();
    cx.use_input(move |event| {
        if event.key.up_arrow {
            c.update(|n| n + 1);
        } else if event.key.down_arrow {
            c.update(|n| n - 1);
        } else if event.input == "r" {
            c.set(0);
        } else if event.input == "q" {
            app.exit();
        }
    });

    let value = count.get();
    let color = match value {
        n if n > 0 => "green",
        n if n < 0 => "red",
        _ => "default",
    };

    box_primitive(
        BoxProps {
            border_style: BorderStyle::Rounded,
            border_color: Some(ColorValue::from("cyan")),
            padding_x: Some(1),
            width: Dimension::Cells(30),
            ..Default::default()
        },
        vec![
            text(
                TextProps {
                    bold: true,
                    color: Some(ColorValue::from(color)),
                    ..Default::default()
                },
                format!("Count: {value}"),
            ),
            text(
                TextProps {
                    dim: true,
                    ..Default::default()
                },
                "up/down  r reset  q quit",
            ),
        ],
    )
}

fn main() -> ember_tui::Result<()> {
    render(counter, AppConfig::default())?.wait_until_exit()
}
