use clap::*;
use std::io::Write;
use tmstack::libs::extract::Extractor;
use tmstack::libs::record::{AlignmentRecord, ScoreField};
use tmstack::libs::table::{write_records, QueryResultTable};

// Create clap subcommand arguments
pub fn make_subcommand() -> Command {
    Command::new("parse")
        .about("Parse TM-align reports into a table")
        .after_help(
            r###"
Extracts one record per alignment from TM-align reports. A file may hold many
reports concatenated, as `tmstack run` writes to reports/.

Columns:
    query template qlen tlen aligned RMSD ident TM1 TM2 TM-score

* The query is named by --query, or by the file name without its last
  extension; for reports/<q>.aln of `tmstack run` that is the query file name
* The template is the file name of `Name of Chain_2`
* Alignments without both TM-scores are skipped
* --threshold implies --sort

Examples:
1. Parse a report:
   tmstack parse tm_out/reports/q1.pdb.aln

2. Best hits first, only those >= 0.5:
   tmstack parse tm_out/reports/q1.pdb.aln --threshold 0.5

3. From stdin:
   TMalign q1.pdb t1.pdb | tmstack parse stdin --query q1.pdb

"###,
        )
        .arg(
            Arg::new("infiles")
                .required(true)
                .num_args(1..)
                .index(1)
                .help("Input report(s). [stdin] for standard input"),
        )
        .arg(
            Arg::new("query")
                .long("query")
                .short('q')
                .num_args(1)
                .help("Query name for all records"),
        )
        .arg(
            Arg::new("sort")
                .long("sort")
                .short('s')
                .action(ArgAction::SetTrue)
                .help("Sort the records of each file by TM-score, descending"),
        )
        .arg(
            Arg::new("threshold")
                .long("threshold")
                .short('t')
                .num_args(1)
                .value_parser(value_parser!(f64))
                .help("Keep records with TM-score >= this value"),
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
            Arg::new("outfile")
                .long("outfile")
                .short('o')
                .num_args(1)
                .default_value("stdout")
                .help("Output filename. [stdout] for screen"),
        )
}

// command implementation
pub fn execute(args: &ArgMatches) -> anyhow::Result<()> {
    //----------------------------
    // Args
    //----------------------------
    let mut writer = tmstack::writer(args.get_one::<String>("outfile").unwrap())?;

    let opt_query = args.get_one::<String>("query");
    let is_sort = args.get_flag("sort");
    let opt_threshold = args.get_one::<f64>("threshold").copied();
    let score = args.get_one::<String>("score").unwrap().parse::<ScoreField>()?;

    let extractor = Extractor::new(score);

    //----------------------------
    // Ops
    //----------------------------
    let mut rows: Vec<AlignmentRecord> = vec![];
    for infile in args.get_many::<String>("infiles").unwrap() {
        let text = tmstack::read_text(infile)?;
        let query = match opt_query {
            Some(q) => q.to_string(),
            None => tmstack::file_stem(std::path::Path::new(infile)),
        };

        let records = extractor.records(&query, &text);
        if is_sort || opt_threshold.is_some() {
            let table = QueryResultTable::from_records(records);
            match opt_threshold {
                Some(t) => rows.extend(table.stack(t).records().iter().cloned()),
                None => rows.extend(table.records().iter().cloned()),
            }
        } else {
            rows.extend(records);
        }
    }

    //----------------------------
    // Output
    //----------------------------
    write_records(&mut writer, &rows)?;
    writer.flush()?;

    Ok(())
}
