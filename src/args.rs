use clap::{Arg, ArgAction, Command};

fn shard_count_args(cmd: Command, required: bool) -> Command {
    cmd.arg(
        Arg::new("data-shards")
            .short('d')
            .long("data-shards")
            .help("Number of data shards")
            .value_name("N")
            .value_parser(clap::value_parser!(usize))
            .required(required),
    )
    .arg(
        Arg::new("parity-shards")
            .short('p')
            .long("parity-shards")
            .help("Number of parity shards")
            .value_name("N")
            .value_parser(clap::value_parser!(usize))
            .required(required),
    )
}

/// Command-line definition for the `rsec` tool
pub fn build_cli() -> Command {
    Command::new("rsec")
        .version(env!("CARGO_PKG_VERSION"))
        .about("Reed-Solomon erasure coding over GF(2^8)")
        .arg_required_else_help(true)
        .arg(
            Arg::new("verbose")
                .short('v')
                .long("verbose")
                .help("Show debug output")
                .global(true)
                .action(ArgAction::SetTrue),
        )
        .arg(
            Arg::new("quiet")
                .short('q')
                .long("quiet")
                .help("Quiet mode - errors only")
                .global(true)
                .action(ArgAction::SetTrue),
        )
        .arg(
            Arg::new("threads")
                .short('t')
                .long("threads")
                .help("Number of CPU threads for computation (0 = auto-detect)")
                .value_name("N")
                .global(true)
                .default_value("0"),
        )
        .arg(
            Arg::new("no-parallel")
                .long("no-parallel")
                .help("Disable all parallel processing")
                .global(true)
                .action(ArgAction::SetTrue),
        )
        .arg(
            Arg::new("parallel-threshold")
                .long("parallel-threshold")
                .help("Minimum shard size in bytes before rows are computed in parallel")
                .value_name("BYTES")
                .global(true),
        )
        .subcommand(shard_count_args(
            Command::new("encode")
                .visible_alias("e")
                .about("Split a file into data and parity shards")
                .arg(
                    Arg::new("input")
                        .help("File to encode")
                        .required(true)
                        .index(1),
                )
                .arg(
                    Arg::new("output_dir")
                        .short('o')
                        .long("output-dir")
                        .help("Directory for shard files (default: next to the input)")
                        .value_name("DIR"),
                ),
            true,
        ))
        .subcommand(shard_count_args(
            Command::new("decode")
                .visible_alias("d")
                .about("Rebuild a file from surviving shard files")
                .arg(
                    Arg::new("shards")
                        .help("Shard files named <name>.shard.<index>")
                        .required(true)
                        .num_args(1..)
                        .index(1),
                )
                .arg(
                    Arg::new("output")
                        .short('o')
                        .long("output")
                        .help("Output file")
                        .value_name("FILE")
                        .required(true),
                )
                .arg(
                    Arg::new("length")
                        .short('l')
                        .long("length")
                        .help("Original payload length (default: from the .meta file)")
                        .value_name("BYTES")
                        .value_parser(clap::value_parser!(usize)),
                ),
            false,
        ))
        .subcommand(shard_count_args(
            Command::new("matrix")
                .visible_alias("m")
                .about("Print the generator matrix for a shard layout"),
            true,
        ))
}
