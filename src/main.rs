use std::fs::File;
use std::io::{self, BufRead, BufReader};
use std::path::PathBuf;
use anyhow::{anyhow, bail, Context, Result};
use clap::Parser;

use bufmgr::{BufferPoolConfig, BufferPoolManager, PageId, ReplacementStrategy, StrategyParams};

/// Bytes shown by `dump`
const DUMP_BYTES: usize = 32;

#[derive(Parser)]
#[command(author, version, about = "Replay a page access trace against a buffer pool")]
struct Cli {
    /// Backing page file path
    #[arg(short, long, default_value = "database.db")]
    file: PathBuf,

    /// Buffer pool size (number of frames)
    #[arg(short, long, default_value_t = 3)]
    capacity: usize,

    /// Replacement strategy: fifo, lru, clock, lfu or lru-k
    #[arg(short, long, default_value = "fifo")]
    strategy: String,

    /// K for the lru-k strategy
    #[arg(short = 'k', long, default_value_t = 2)]
    lru_k: usize,

    /// Trace file; standard input when omitted
    trace: Option<PathBuf>,
}

/// One line of a trace
#[derive(Debug, PartialEq)]
enum Command {
    Pin(PageId),
    Unpin(PageId),
    Dirty(PageId),
    Force(PageId),
    Write(PageId, String),
    Dump(PageId),
    Flush,
    Stats,
    Json,
}

fn parse_page(arg: Option<&str>) -> Result<PageId> {
    let arg = arg.ok_or_else(|| anyhow!("missing page number"))?;
    arg.parse::<PageId>()
        .with_context(|| format!("invalid page number '{}'", arg))
}

fn parse_command(line: &str) -> Result<Option<Command>> {
    let line = line.trim();
    if line.is_empty() || line.starts_with('#') {
        return Ok(None);
    }

    let mut parts = line.splitn(3, char::is_whitespace);
    let verb = parts.next().unwrap_or_default().to_ascii_lowercase();
    let command = match verb.as_str() {
        "pin" => Command::Pin(parse_page(parts.next())?),
        "unpin" => Command::Unpin(parse_page(parts.next())?),
        "dirty" => Command::Dirty(parse_page(parts.next())?),
        "force" => Command::Force(parse_page(parts.next())?),
        "write" => {
            let page_id = parse_page(parts.next())?;
            let text = parts.next().unwrap_or_default().trim().to_string();
            Command::Write(page_id, text)
        }
        "dump" => Command::Dump(parse_page(parts.next())?),
        "flush" => Command::Flush,
        "stats" => Command::Stats,
        "json" => Command::Json,
        other => bail!("unknown command '{}'", other),
    };
    Ok(Some(command))
}

fn execute(pool: &BufferPoolManager, command: &Command) -> Result<()> {
    match command {
        Command::Pin(page_id) => {
            let handle = pool.pin_page(*page_id)?;
            println!("pinned page {} in frame {} (pins: {})", page_id, handle.frame_id(), handle.pin_count());
        }
        Command::Unpin(page_id) => pool.unpin_page(*page_id)?,
        Command::Dirty(page_id) => pool.mark_dirty(*page_id)?,
        Command::Force(page_id) => pool.force_page(*page_id)?,
        Command::Write(page_id, text) => {
            let page = pool.fetch_page(*page_id)?;
            {
                let mut content = page.write()?;
                let len = text.len().min(content.data.len());
                content.data[..len].copy_from_slice(&text.as_bytes()[..len]);
            }
            page.mark_dirty()?;
        }
        Command::Dump(page_id) => {
            let page = pool.fetch_page(*page_id)?;
            let content = page.read()?;
            println!("page {}: {}", page_id, hex::encode(&content.data[..DUMP_BYTES]));
        }
        Command::Flush => {
            let written = pool.flush_pool()?;
            println!("flushed {} page(s)", written);
        }
        Command::Stats => {
            println!("{}", pool.snapshot());
            println!("reads: {}, writes: {}", pool.read_count(), pool.write_count());
        }
        Command::Json => println!("{}", serde_json::to_string(&pool.snapshot())?),
    }
    Ok(())
}

fn main() -> Result<()> {
    let cli = Cli::parse();

    let strategy: ReplacementStrategy = cli.strategy.parse()?;
    let config = BufferPoolConfig::new(cli.file.clone(), cli.capacity, strategy)
        .with_strategy_params(StrategyParams { lru_k: cli.lru_k });
    let mut pool = BufferPoolManager::from_config(&config)
        .with_context(|| format!("failed to open buffer pool over {}", cli.file.display()))?;

    let reader: Box<dyn BufRead> = match &cli.trace {
        Some(path) => Box::new(BufReader::new(
            File::open(path).with_context(|| format!("cannot open trace {}", path.display()))?,
        )),
        None => Box::new(BufReader::new(io::stdin())),
    };

    for (number, line) in reader.lines().enumerate() {
        let line = line?;
        let result = parse_command(&line).and_then(|command| match command {
            Some(command) => execute(&pool, &command),
            None => Ok(()),
        });
        if let Err(e) = result {
            eprintln!("line {}: {:#}", number + 1, e);
        }
    }

    pool.shutdown().context("failed to shut down buffer pool")?;
    Ok(())
}
