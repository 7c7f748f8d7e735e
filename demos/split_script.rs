//! Split a script with SQL Server `GO` batches and single-line commands.

use sqlscript_rs::{DelimiterSpec, SplitterConfig, split_str};

fn main() {
    let script = "\
SET NOCOUNT ON
create table t (id int)
GO
insert into t values (1) -- first row
insert into t values (2)
GO
select * from t where note = 'GO';
";

    let config = SplitterConfig::new()
        .delimiter(DelimiterSpec::mssql())
        .single_line_commands(true);

    match split_str(script, &config) {
        Ok(commands) => {
            for command in &commands {
                println!(
                    "line {} [{}..{}] {:?}",
                    command.line, command.start, command.end, command.terminator
                );
                println!("{}\n", command.text());
            }
        }
        Err(e) => eprintln!("error: {e}"),
    }
}
