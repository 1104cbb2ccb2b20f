use anyhow::{Context, Result};
use env_logger::Env;
use log::info;
use std::env;

use sitemap_walker::cert::{convert_file, CertConfig, HexCase};

fn print_usage(program: &str) {
    eprintln!("Usage:");
    eprintln!("  {} <path> [--upper] [--name IDENT] [--wrap N]", program);
    eprintln!("  --upper       Uppercase hex digits");
    eprintln!("  --name IDENT  Wrap the bytes in `const unsigned char IDENT[] = {{ ... }};`");
    eprintln!("  --wrap N      Put at most N bytes on each line");
}

fn main() -> Result<()> {
    // Initialize logger
    env_logger::Builder::from_env(Env::default().default_filter_or("info")).init();

    let args: Vec<String> = env::args().collect();
    let program = args.first().map(|s| s.as_str()).unwrap_or("cert2hex");

    let mut path = None;
    let mut upper = false;
    let mut name = None;
    let mut wrap = None;

    let mut rest = args.iter().skip(1);
    while let Some(arg) = rest.next() {
        match arg.as_str() {
            "--upper" => upper = true,
            "--name" => name = Some(rest.next().context("--name needs a value")?.clone()),
            "--wrap" => {
                let n: usize = rest
                    .next()
                    .context("--wrap needs a value")?
                    .parse()
                    .context("--wrap must be a whole number")?;
                wrap = Some(n);
            }
            "-h" | "--help" => {
                print_usage(program);
                return Ok(());
            }
            other if path.is_none() && !other.starts_with("--") => path = Some(other.to_string()),
            other => {
                print_usage(program);
                anyhow::bail!("Unexpected argument: {}", other);
            }
        }
    }

    let Some(path) = path else {
        print_usage(program);
        anyhow::bail!("A certificate file path is required");
    };

    let mut builder = CertConfig::builder(&path);
    if upper {
        builder = builder.case(HexCase::Upper);
    }
    if let Some(name) = &name {
        builder = builder.array_name(name);
    }
    if let Some(n) = wrap {
        builder = builder.tokens_per_line(n);
    }

    let dump = convert_file(&builder.build())?;

    println!("{}", dump);
    info!("Converted {} bytes from {}", dump.byte_count, path);

    Ok(())
}
