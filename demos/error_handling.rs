//! Demonstrate error handling for invalid input.

fn main() {
    // Missing script file
    match sqlscript_rs::ScriptSplitter::from_file(
        "does-not-exist.sql",
        "UTF-8",
        sqlscript_rs::SplitterConfig::new(),
    ) {
        Ok(_) => println!("Opened OK (unexpected)"),
        Err(sqlscript_rs::Error::Source(e)) => {
            println!("Source error: {e}");
            println!("  Kind: {e:?}");
        }
        Err(sqlscript_rs::Error::Delimiter(e)) => {
            println!("Delimiter error: {e}");
        }
    }

    println!();

    // Unsupported encoding
    match sqlscript_rs::FileSource::open("script.sql", "UTF-16") {
        Ok(_) => println!("Opened OK (unexpected)"),
        Err(e) => println!("Source error: {e}"),
    }

    println!();

    // Delimiter with whitespace
    match "G O:nl".parse::<sqlscript_rs::DelimiterSpec>() {
        Ok(_) => println!("Parsed OK (unexpected)"),
        Err(e) => {
            println!("Delimiter error: {e}");
            println!("  Kind: {:?}", e.kind);
        }
    }

    println!();

    // Unterminated literal is not an error: the rest of the script
    // becomes the last command.
    let commands = sqlscript_rs::split_str(
        "select 1; select 'open",
        &sqlscript_rs::SplitterConfig::new(),
    )
    .unwrap_or_default();
    for command in commands {
        println!("{:?}", command.text());
    }
}
