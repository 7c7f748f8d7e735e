//! Map caret positions in an editor buffer to the statement under them.

use sqlscript_rs::{ScriptSplitter, SplitterConfig};

fn main() {
    let buffer = "select * from orders;\n\n-- totals\nselect sum(amount)\n  from orders;\n";
    let splitter = match ScriptSplitter::from_text(buffer, SplitterConfig::new()) {
        Ok(s) => s,
        Err(e) => {
            eprintln!("error: {e}");
            return;
        }
    };

    for caret in [0, 10, 21, 23, 40, buffer.len()] {
        match splitter.command_index_at(caret) {
            Some(index) => {
                let text = splitter.command(index).map_or("", |c| c.text());
                println!("caret {caret:>3} -> #{index}: {text:?}");
            }
            None => println!("caret {caret:>3} -> no statement"),
        }
    }

    splitter.done();
}
