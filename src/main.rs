//! # chathisto CLI
//!
//! Command-line interface for the chathisto library.

use std::io;
use std::process;
use std::time::Instant;

use clap::Parser as ClapParser;

use chathisto::ChathistoError;
use chathisto::cli::Args;
use chathisto::format::write_to_format;
use chathisto::fragment::{DirectorySource, FragmentPattern};
use chathisto::histogram::Distribution;
use chathisto::present::{HistogramPresenter, TextPresenter};
use chathisto::progress::stderr_progress;
use chathisto::timeline::TimelineBuilder;

fn main() {
    let args = <Args as ClapParser>::parse();

    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or(args.log_filter()))
        .init();

    if let Err(e) = run(&args) {
        eprintln!("❌ Error: {}", e);
        process::exit(1);
    }
}

fn run(args: &Args) -> Result<(), ChathistoError> {
    let total_start = Instant::now();

    // Reject bad flags before touching the filesystem
    let histogram_config = args.histogram_config()?;
    let chart_config = args.chart_config()?;
    let offset = args.offset()?;
    let export = args.export();

    println!("📦 chathisto v{}", env!("CARGO_PKG_VERSION"));
    println!("━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━");
    println!("📂 Input:   {}", args.dir.display());
    println!("🔎 Files:   {}[N]{}", args.prefix, args.suffix);
    println!("🕒 Offset:  UTC{}", offset);
    println!("📊 Bins:    {}", histogram_config.bin_count);
    if let Some((path, format)) = &export {
        println!("💾 Output:  {} ({})", path.display(), format);
    }
    println!();

    println!("⏳ Reading fragments...");
    let read_start = Instant::now();
    let mut builder = TimelineBuilder::new(DirectorySource::new(&args.dir))
        .with_pattern(FragmentPattern::new(args.fragment_config()))
        .with_offset(offset);
    if args.verbose > 0 {
        builder = builder.with_progress(stderr_progress());
    }
    let timeline = builder.build()?;
    println!(
        "   Found {} messages in {} fragments ({:.2}s)",
        timeline.len(),
        timeline.fragments().len(),
        read_start.elapsed().as_secs_f64()
    );
    if timeline.skipped() > 0 {
        println!("   Skipped {} non-text entries", timeline.skipped());
    }

    let distribution = Distribution::from_timeline(&timeline, &histogram_config)?;

    if !args.no_chart {
        println!();
        let mut presenter = TextPresenter::new(io::stdout().lock()).with_chart(chart_config);
        presenter.present(&distribution, &histogram_config)?;
    }

    if let Some((path, format)) = &export {
        println!();
        println!("💾 Writing {}...", format);
        write_to_format(&distribution, path, *format, &histogram_config)?;
        println!("   Saved to {}", path.display());
    }

    println!();
    if distribution.is_empty() {
        println!("⚠️  No messages found in {}", args.dir.display());
    } else {
        println!("✅ Done!");
    }

    println!();
    println!("📊 Summary:");
    println!("   Fragments: {}", timeline.fragments().len());
    println!("   Messages:  {}", timeline.len());
    if let Some((earliest, latest)) = timeline.date_range() {
        println!(
            "   Range:     {} → {}",
            earliest.format("%Y-%m-%d %H:%M:%S"),
            latest.format("%Y-%m-%d %H:%M:%S")
        );
    }
    println!(
        "   Total time: {:.2}s",
        total_start.elapsed().as_secs_f64()
    );

    Ok(())
}
