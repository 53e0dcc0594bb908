//! Command line parsing tests

use clap::Parser;
use consumer_pool::app::cli::{resolve, Args};
use std::path::PathBuf;

fn parse(argv: &[&str]) -> Result<Args, clap::Error> {
    Args::try_parse_from(std::iter::once("consumer-pool").chain(argv.iter().copied()))
}

#[test]
fn test_no_arguments_uses_defaults() {
    let args = parse(&[]).unwrap();
    assert_eq!(args.log_file, None);
    assert_eq!(args.workers, None);
    assert!(!args.force);
    assert_eq!(args.color_override(), None);

    let settings = resolve(&args, None).unwrap();
    assert_eq!(settings.demo.output, PathBuf::from("test.log"));
    assert_eq!(settings.demo.workers, 1);
    assert_eq!(settings.demo.count, 10);
}

#[test]
fn test_short_and_long_forms() {
    let args = parse(&["-f", "out.log", "-w", "3", "-n", "50", "--force"]).unwrap();
    assert_eq!(args.log_file, Some(PathBuf::from("out.log")));
    assert_eq!(args.workers, Some(3));
    assert_eq!(args.count, Some(50));
    assert!(args.force);

    let args = parse(&["--log-file=other.log", "--workers=2", "--count=5"]).unwrap();
    assert_eq!(args.log_file, Some(PathBuf::from("other.log")));
    assert_eq!(args.workers, Some(2));
    assert_eq!(args.count, Some(5));
}

#[test]
fn test_invalid_values_rejected() {
    assert!(parse(&["--workers", "many"]).is_err());
    assert!(parse(&["--log-level", "loud"]).is_err());
    assert!(parse(&["--log-format", "xml"]).is_err());
    assert!(parse(&["--color", "--no-color"]).is_err());
}

#[test]
fn test_color_flags() {
    assert_eq!(parse(&["--color"]).unwrap().color_override(), Some(true));
    assert_eq!(parse(&["--no-color"]).unwrap().color_override(), Some(false));
}

#[test]
fn test_zero_workers_fails_resolution() {
    let args = parse(&["--workers", "0"]).unwrap();
    let err = resolve(&args, None).unwrap_err();
    assert!(err.to_string().contains("worker"));
}
