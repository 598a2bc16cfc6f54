extern crate clap;
use clap::*;

mod cmd_tmstack;

fn main() -> anyhow::Result<()> {
    env_logger::Builder::new()
        .filter_level(log::LevelFilter::Info)
        .parse_default_env()
        .format_timestamp(None)
        .format_target(false)
        .init();

    let app = Command::new("tmstack")
        .version(crate_version!())
        .author(crate_authors!())
        .about("`tmstack` - Batch TM-align comparisons and TM-score stacks")
        .propagate_version(true)
        .arg_required_else_help(true)
        .color(ColorChoice::Auto)
        .subcommand(cmd_tmstack::run::make_subcommand())
        .subcommand(cmd_tmstack::parse::make_subcommand())
        .after_help(
            r###"Subcommands:

* run   - Align query structures against templates, sort, stack, summarize
* parse - Parse existing TM-align reports into a table

Set RUST_LOG=debug to see every skipped alignment.

"###,
        );

    // Check which subcomamnd the user ran...
    match app.get_matches().subcommand() {
        Some(("run", sub_matches)) => cmd_tmstack::run::execute(sub_matches),
        Some(("parse", sub_matches)) => cmd_tmstack::parse::execute(sub_matches),
        _ => unreachable!(),
    }?;

    Ok(())
}
