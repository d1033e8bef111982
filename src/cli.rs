use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use clap::{Parser, Subcommand};
use comfy_table::{Cell, Table};
use dialoguer::{Input, Select};

use ytmusic_dl::config::{self, Config};
use ytmusic_dl::core::tagger;
use ytmusic_dl::models::{MusicQuery, Quality};
use ytmusic_dl::Downloader;

use crate::renamer;

#[derive(Parser)]
#[command(name = "ytmusic-dl", about = "Search YouTube, download audio as tagged MP3")]
pub struct Cli {
    #[command(subcommand)]
    pub command: Commands,

    /// Debug logging
    #[arg(short, long, global = true)]
    pub verbose: bool,
}

#[derive(Subcommand)]
pub enum Commands {
    /// Search YouTube Music and YouTube
    Search {
        query: String,
        /// Print JSON instead of a table
        #[arg(long)]
        json: bool,
    },
    /// Print the video id of a YouTube URL
    Id { url: String },
    /// Show the downloadable video URL for a quality
    Mp4 {
        /// Video id or YouTube URL
        query: String,
        /// Format itag, `highest` or `lowest`
        #[arg(long, default_value_t = Quality::default())]
        quality: Quality,
        #[arg(long)]
        json: bool,
    },
    /// Download a video's audio as MP3
    Mp3 {
        /// Video id or YouTube URL
        url: String,
    },
    /// Search, download and tag a track
    Music {
        query: String,
        /// Choose among the search results instead of taking the first
        #[arg(long)]
        pick: bool,
        /// Move the result here as "Artist - Title.mp3"
        #[arg(long)]
        out: Option<PathBuf>,
    },
    /// Show the ID3 tags of a file
    Tags { file: PathBuf },
    /// Edit the config file
    Config,
}

pub fn run(cli: Cli) -> Result<()> {
    match cli.command {
        Commands::Search { query, json } => cmd_search(&query, json),
        Commands::Id { url } => cmd_id(&url),
        Commands::Mp4 {
            query,
            quality,
            json,
        } => cmd_mp4(&query, quality, json),
        Commands::Mp3 { url } => cmd_mp3(&url),
        Commands::Music { query, pick, out } => cmd_music(&query, pick, out.as_deref()),
        Commands::Tags { file } => cmd_tags(&file),
        Commands::Config => cmd_config(),
    }
}

fn downloader() -> Result<Downloader> {
    Downloader::from_config(&config::load_config()).context("cannot set up downloader")
}

fn cmd_search(query: &str, json: bool) -> Result<()> {
    let results = downloader()?
        .search_track(query)
        .context("search failed")?;

    if json {
        println!("{}", serde_json::to_string_pretty(&results)?);
        return Ok(());
    }

    if results.is_empty() {
        println!("No results for {:?}", query);
        return Ok(());
    }

    let mut table = Table::new();
    table.set_header(vec!["#", "Source", "Title", "Artist", "Album", "Length", "ID"]);
    for (i, result) in results.iter().enumerate() {
        let track = result.track();
        table.add_row(vec![
            Cell::new(i + 1),
            Cell::new(result.source_name()),
            Cell::new(&track.title),
            Cell::new(&track.artist),
            Cell::new(&track.album),
            Cell::new(&track.duration.label),
            Cell::new(&track.video_id),
        ]);
    }
    println!("{table}");
    Ok(())
}

fn cmd_id(url: &str) -> Result<()> {
    let id = Downloader::extract_video_id(url)?;
    println!("{}", id);
    Ok(())
}

fn cmd_mp4(query: &str, quality: Quality, json: bool) -> Result<()> {
    let info = downloader()?.mp4(query, quality)?;

    if json {
        println!("{}", serde_json::to_string_pretty(&info)?);
        return Ok(());
    }

    let mut table = Table::new();
    table.add_row(vec!["Title", info.title.as_str()]);
    table.add_row(vec!["Channel", info.channel.as_str()]);
    table.add_row(vec!["Date", info.date.as_deref().unwrap_or("-")]);
    table.add_row(vec!["Duration".to_string(), format!("{}s", info.duration)]);
    table.add_row(vec!["Quality", info.quality.as_deref().unwrap_or("-")]);
    table.add_row(vec![
        "Size".to_string(),
        info.content_length
            .map(|n| format!("{} bytes", n))
            .unwrap_or_else(|| "-".to_string()),
    ]);
    table.add_row(vec!["Thumbnail", info.thumb.as_ref().map_or("-", |t| t.url.as_str())]);
    table.add_row(vec!["URL", info.video_url.as_str()]);
    println!("{table}");
    Ok(())
}

fn cmd_mp3(url: &str) -> Result<()> {
    let result = downloader()?.mp3(url)?;
    println!(
        "{} - {} ({}s)",
        result.meta.channel, result.meta.title, result.meta.seconds
    );
    println!("{} ({} bytes)", result.path.display(), result.size);
    Ok(())
}

fn cmd_music(query: &str, pick: bool, out: Option<&Path>) -> Result<()> {
    let downloader = downloader()?;

    let music_query = if pick {
        let results = downloader.search_track(query).context("search failed")?;
        if results.is_empty() {
            println!("No results for {:?}", query);
            return Ok(());
        }
        let items: Vec<String> = results
            .iter()
            .map(|r| format!("[{}] {}", r.source_name(), r.summary()))
            .collect();
        let selection = Select::new()
            .with_prompt("Choose a track")
            .items(&items)
            .default(0)
            .interact()?;
        MusicQuery::Resolved(vec![results[selection].clone()])
    } else {
        MusicQuery::from(query)
    };

    let music = downloader.download_music(music_query)?;
    let path = match out {
        Some(dir) => renamer::move_into(&music.path, dir, music.meta.track())?,
        None => music.path.clone(),
    };

    println!("{}", music.meta.summary());
    println!("{} ({} bytes)", path.display(), music.size);
    Ok(())
}

fn cmd_tags(file: &Path) -> Result<()> {
    let Some(tags) = tagger::read_tags(file)
        .with_context(|| format!("cannot read tags of {}", file.display()))?
    else {
        println!("{} has no ID3 tag", file.display());
        return Ok(());
    };

    let mut table = Table::new();
    table.set_header(vec!["Field", "Value"]);
    table.add_row(vec!["Title", tags.title.as_deref().unwrap_or("-")]);
    table.add_row(vec!["Artist", tags.artist.as_deref().unwrap_or("-")]);
    table.add_row(vec!["Original artist", tags.original_artist.as_deref().unwrap_or("-")]);
    table.add_row(vec!["Album", tags.album.as_deref().unwrap_or("-")]);
    table.add_row(vec![
        "Year".to_string(),
        tags.year.map(|y| y.to_string()).unwrap_or_else(|| "-".to_string()),
    ]);
    table.add_row(vec![
        "Cover".to_string(),
        tags.cover
            .map(|c| format!("{} ({} bytes)", c.mime_type, c.data.len()))
            .unwrap_or_else(|| "-".to_string()),
    ]);
    println!("{table}");
    Ok(())
}

fn cmd_config() -> Result<()> {
    let mut cfg: Config = config::load_config();

    println!("ytmusic-dl settings ({})\n", config::config_path().display());

    let temp_dir: String = Input::new()
        .with_prompt("Temp directory")
        .with_initial_text(cfg.general.temp_dir.display().to_string())
        .interact_text()?;

    let language: String = Input::new()
        .with_prompt("Language (hl)")
        .with_initial_text(cfg.general.language.clone())
        .interact_text()?;

    let yt_dlp: String = Input::new()
        .with_prompt("yt-dlp executable")
        .with_initial_text(cfg.tools.yt_dlp.display().to_string())
        .interact_text()?;

    let ffmpeg: String = Input::new()
        .with_prompt("ffmpeg executable")
        .with_initial_text(cfg.tools.ffmpeg.display().to_string())
        .interact_text()?;

    cfg.general.temp_dir = PathBuf::from(temp_dir);
    cfg.general.language = language;
    cfg.tools.yt_dlp = PathBuf::from(yt_dlp);
    cfg.tools.ffmpeg = PathBuf::from(ffmpeg);

    config::save_config(&cfg).context("cannot save config")?;
    println!("\nSaved.");
    Ok(())
}
