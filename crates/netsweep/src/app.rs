use clap::{Arg, ArgAction, Command, value_parser};
use clap_complete::Shell;

pub fn build_cli() -> Command {
    Command::new("netsweep")
        .version(env!("CARGO_PKG_VERSION"))
        .about("Delete expired NAT gateways, VPC endpoints, peering connections and route tables")
        .long_about("netsweep reads TTL and protection tags on the networking resources of a VPC and deletes the expired ones in dependency order: peering connections and endpoints first, then NAT gateways (waiting for them to finish deleting), then route tables. A failed deletion is reported and the sweep moves on.")
        .arg(
            Arg::new("verbose")
                .short('v')
                .long("verbose")
                .help("Enable verbose logging output")
                .action(ArgAction::SetTrue)
                .global(true),
        )
        .subcommand_required(true)
        .arg_required_else_help(true)
        .subcommand(
            Command::new("sweep")
                .about("Sweep one or more VPCs for expired resources")
                .arg(
                    Arg::new("vpc")
                        .long("vpc")
                        .help("VPC id to sweep (repeat for several VPCs)")
                        .required(true)
                        .action(ArgAction::Append)
                )
                .arg(
                    Arg::new("inventory")
                        .long("inventory")
                        .short('i')
                        .help("JSON inventory of VPC resources to sweep")
                        .required(true)
                        .value_parser(value_parser!(std::path::PathBuf))
                )
                .arg(
                    Arg::new("dry-run")
                        .long("dry-run")
                        .help("Report what would be deleted without deleting anything")
                        .action(ArgAction::SetTrue)
                )
                .arg(
                    Arg::new("disable-ttl-check")
                        .long("disable-ttl-check")
                        .help("Treat every unprotected resource as expired")
                        .action(ArgAction::SetTrue)
                )
                .arg(
                    Arg::new("ttl-tag")
                        .long("ttl-tag")
                        .help("Tag holding the TTL in seconds (overrides config, default: ttl)")
                )
                .arg(
                    Arg::new("poll-interval")
                        .long("poll-interval")
                        .help("Seconds between NAT gateway deletion checks (overrides config)")
                        .value_parser(value_parser!(u64))
                )
                .arg(
                    Arg::new("max-wait")
                        .long("max-wait")
                        .help("Seconds to wait for NAT gateway deletion (overrides config)")
                        .value_parser(value_parser!(u64))
                )
                .arg(
                    Arg::new("json")
                        .long("json")
                        .help("Output the sweep reports in JSON format")
                        .action(ArgAction::SetTrue)
                )
        )
        .subcommand(
            Command::new("completions")
                .about("Generate shell completion scripts")
                .arg(
                    Arg::new("shell")
                        .help("Shell to generate completions for")
                        .required(true)
                        .index(1)
                        .value_parser(value_parser!(Shell))
                )
        )
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::path::PathBuf;

    #[test]
    fn test_cli_build() {
        let app = build_cli();
        assert_eq!(app.get_name(), "netsweep");
        app.debug_assert();
    }

    #[test]
    fn test_sweep_accepts_repeated_vpc() {
        let matches = build_cli()
            .try_get_matches_from(vec![
                "netsweep",
                "sweep",
                "--vpc",
                "vpc-1",
                "--vpc",
                "vpc-2",
                "--inventory",
                "inventory.json",
                "--dry-run",
            ])
            .unwrap();

        let sub = matches.subcommand_matches("sweep").unwrap();
        let vpcs: Vec<&String> = sub.get_many::<String>("vpc").unwrap().collect();
        assert_eq!(vpcs, vec!["vpc-1", "vpc-2"]);
        assert_eq!(
            sub.get_one::<PathBuf>("inventory"),
            Some(&PathBuf::from("inventory.json"))
        );
        assert!(sub.get_flag("dry-run"));
        assert!(!sub.get_flag("json"));
    }

    #[test]
    fn test_sweep_requires_vpc_and_inventory() {
        let missing_vpc =
            build_cli().try_get_matches_from(vec!["netsweep", "sweep", "--inventory", "x.json"]);
        assert!(missing_vpc.is_err());

        let missing_inventory =
            build_cli().try_get_matches_from(vec!["netsweep", "sweep", "--vpc", "vpc-1"]);
        assert!(missing_inventory.is_err());
    }

    #[test]
    fn test_poll_interval_must_be_numeric() {
        let result = build_cli().try_get_matches_from(vec![
            "netsweep",
            "sweep",
            "--vpc",
            "vpc-1",
            "--inventory",
            "x.json",
            "--poll-interval",
            "soon",
        ]);
        assert!(result.is_err());
    }

    #[test]
    fn test_verbose_is_global() {
        let matches = build_cli()
            .try_get_matches_from(vec!["netsweep", "completions", "bash", "-v"])
            .unwrap();
        assert!(matches.get_flag("verbose"));
    }
}
