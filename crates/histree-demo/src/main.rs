#![forbid(unsafe_code)]

//! histree demo
//!
//! Scripts the reference tree from the row-height walkthrough, renders it
//! with per-branch colors, then demonstrates selection, in-place
//! replacement, and clearing.
//!
//! # Running
//!
//! ```sh
//! cargo run -p histree-demo
//! RUST_LOG=debug cargo run -p histree-demo   # with mutation tracing
//! ```

use histree_core::{BoxError, Capture, Memento, Originator, StoreError, VersionTree, originator_fn};
use histree_widgets::{GraphView, Rgb, Surface};
use tracing_subscriber::EnvFilter;

/// Originator capturing a running counter, like a host checkpointing an
/// ever-changing document.
struct Counter {
    value: u32,
}

impl Originator<u32> for Counter {
    fn capture(&mut self) -> Result<Capture<u32>, BoxError> {
        self.value += 1;
        Ok(Capture::new(
            Memento::new(self.value.to_string(), self.value)
                .with_tooltip(format!("counter state {}", self.value)),
        ))
    }
}

fn labeled(label: &str) -> impl Originator<u32> + use<> {
    let label = label.to_string();
    originator_fn(move || Ok(Capture::new(Memento::new(label.clone(), 0))))
}

/// Render with 24-bit ANSI colors, one line per surface row.
fn paint(surface: &Surface) -> String {
    let mut out = String::new();
    for y in 0..surface.height() {
        let mut line = String::new();
        for x in 0..surface.width() {
            match surface.cell(x, y) {
                Some(cell) => match cell.fg {
                    Some(Rgb { r, g, b }) => {
                        line.push_str(&format!("\x1b[38;2;{r};{g};{b}m{}\x1b[0m", cell.ch));
                    }
                    None => line.push(cell.ch),
                },
                None => line.push(' '),
            }
        }
        out.push_str(line.trim_end());
        out.push('\n');
    }
    out
}

fn main() -> Result<(), StoreError> {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::from_default_env())
        .init();

    let mut tree: VersionTree<u32> = VersionTree::new();
    tree.subscribe(|change| tracing::debug!(?change, "model changed"));
    let mut view = GraphView::new();

    // The tree from the row-height walkthrough.
    let one = tree.append_to_master(&mut labeled("1"))?;
    let two = tree.append_to_master(&mut labeled("2"))?;
    let three = tree.append_to_master(&mut labeled("3"))?;

    tree.fork(one, &mut labeled("A 1.1"))?;

    let branch_2a = tree.fork(two, &mut labeled("A 2.1"))?.branch();
    tree.append(branch_2a, &mut labeled("A 2.2"))?;
    let branch_2b = tree.fork(two, &mut labeled("B 2.1"))?.branch();
    tree.append(branch_2b, &mut labeled("B 2.2"))?;

    tree.fork(three, &mut labeled("A 3.1"))?;
    let branch_3b = tree.fork(three, &mut labeled("B 3.1"))?.branch();
    let tip = tree.append(branch_3b, &mut labeled("B 3.2"))?;

    println!("reference tree:");
    println!("{}", paint(&view.render(&tree)));

    // Select the tip of branch B 3.x; appends are allowed there.
    view.select(Some(histree_core::MementoRef::new(tip, branch_3b)));
    println!(
        "selected B 3.2 (append allowed: {}):",
        view.append_allowed(&tree)
    );
    println!("{}", paint(&view.render(&tree)));

    // Replace the selected snapshot in place; identity and position are kept.
    let replaced = tree.replace(&mut originator_fn(move || {
        Ok(Capture::new(Memento::with_id(tip, "B 3.2'", 0)))
    }))?;
    println!("replaced tip in place (found existing: {replaced}):");
    println!("{}", paint(&view.render(&tree)));

    // Start over with a counter-driven history.
    tree.clear();
    view.reset_colors();
    view.select(None);

    let mut counter = Counter { value: 0 };
    let first = tree.append_to_master(&mut counter)?;
    tree.append_to_master(&mut counter)?;
    tree.fork(first, &mut counter)?;

    println!("fresh counter history after clear:");
    println!("{}", paint(&view.render(&tree)));

    Ok(())
}
