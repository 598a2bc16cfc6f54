use clap::*;
use std::path::{Path, PathBuf};
use tmstack::libs::config::{today, Config};
use tmstack::libs::invoke::TmAlign;
use tmstack::libs::pipeline::{format_elapsed, Pipeline};
use tmstack::libs::record::ScoreField;

// Create clap subcommand arguments
pub fn make_subcommand() -> Command {
    Command::new("run")
        .about("Align every query against every template with TM-align")
        .after_help(
            r###"
Runs TM-align once for each (query, template) pair, parses the reports, and
writes sorted tables, stacks, and two summary tables.

Every regular file in the two directories is an input; they are processed in
file name order.

Outputs, under --outdir, with <q> and <t> the full file names:
* raw/<q>/<t>.aln                - report of each pair
* reports/<q>.aln                - all reports of a query
* tables/<q>.tab                 - parsed records, report order
* sorted/<q>_sorted.tab          - records sorted by TM-score, descending
* stacks/<q>.tab                 - sorted records with TM-score >= --threshold
* <name>_all_results_<date>.tab  - all sorted tables, concatenated
* <name>_stack_counts_<date>.tab - number of stack records per query

Pairs that TM-align cannot align, or whose report has no TM-score within
[0, 1], are left out of every table.

Score fields (--score):
* max - the larger of the two normalized TM-scores
* tm1 - normalized by the length of the query (Chain_1)
* tm2 - normalized by the length of the template (Chain_2)

Examples:
1. Default run, TMalign in PATH:
   tmstack run q/ t/

2. Stricter stacks with a named analysis:
   tmstack run q/ t/ --name kinases --threshold 0.6 -o kinases_out

3. A specific binary and four queries at a time:
   tmstack run q/ t/ --exe ~/bin/TMalign --parallel 4

"###,
        )
        .arg(
            Arg::new("queries")
                .required(true)
                .index(1)
                .help("Directory of query structures"),
        )
        .arg(
            Arg::new("templates")
                .required(true)
                .index(2)
                .help("Directory of template structures"),
        )
        .arg(
            Arg::new("outdir")
                .long("outdir")
                .short('o')
                .num_args(1)
                .default_value("tm_out")
                .help("Output directory"),
        )
        .arg(
            Arg::new("name")
                .long("name")
                .short('n')
                .num_args(1)
                .default_value("my_job")
                .help("Analysis name, prefix of the summary tables"),
        )
        .arg(
            Arg::new("threshold")
                .long("threshold")
                .short('t')
                .num_args(1)
                .default_value("0.4")
                .value_parser(value_parser!(f64))
                .help("Minimal TM-score of a stack record"),
        )
        .arg(
            Arg::new("score")
                .long("score")
                .num_args(1)
                .default_value("max")
                .value_parser(["max", "tm1", "tm2"])
                .help("Which TM-score ranks and filters the records"),
        )
        .arg(
            Arg::new("exe")
                .long("exe")
                .num_args(1)
                .default_value("TMalign")
                .help("TM-align executable"),
        )
        .arg(
            Arg::new("date")
                .long("date")
                .num_args(1)
                .help("Date stamp of the summary tables [default: today, YYYYMMDD]"),
        )
        .arg(
            Arg::new("parallel")
                .long("parallel")
                .short('p')
                .num_args(1)
                .default_value("1")
                .value_parser(value_parser!(usize))
                .help("Number of queries processed in parallel"),
        )
}

// command implementation
pub fn execute(args: &ArgMatches) -> anyhow::Result<()> {
    let start = std::time::Instant::now();

    //----------------------------
    // Args
    //----------------------------
    let query_dir = Path::new(args.get_one::<String>("queries").unwrap());
    let template_dir = Path::new(args.get_one::<String>("templates").unwrap());

    let config = Config {
        analysis_name: args.get_one::<String>("name").unwrap().to_string(),
        threshold: *args.get_one::<f64>("threshold").unwrap(),
        score: args.get_one::<String>("score").unwrap().parse::<ScoreField>()?,
        exe: args.get_one::<String>("exe").unwrap().to_string(),
        outdir: PathBuf::from(args.get_one::<String>("outdir").unwrap()),
        date: args
            .get_one::<String>("date")
            .map(|s| s.to_string())
            .unwrap_or_else(today),
        parallel: *args.get_one::<usize>("parallel").unwrap(),
    };
    config.validate()?;

    let tm_align = TmAlign::new(&config.exe);
    tm_align.check()?;

    //----------------------------
    // Ops
    //----------------------------
    Pipeline::new(&config, &tm_align).run(query_dir, template_dir)?;

    log::info!("Done in {}", format_elapsed(start.elapsed()));

    Ok(())
}
