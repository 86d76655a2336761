//! Suno AI media downloader CLI.
//!
//! Fetches each requested song page, extracts the clip record from the
//! flight stream, then downloads and tags the referenced media. URLs are
//! processed sequentially and independently: one failure is reported and
//! the run moves on to the next URL.

use std::fs;
use std::io::{self, BufRead, Write};
use std::path::{Path, PathBuf};
use std::time::Duration;

use clap::Parser;
use log::{error, info, warn};
use serde::Serialize;
use serde_json::json;
use url::Url;

use suno_dl::fetch::Client;
use suno_dl::{encoding, files, stream, tags, tempo};
use suno_dl::{extract_with_options, Error, ExtractOptions, Record, Result};

/// Download songs, videos and cover art from Suno AI song pages.
#[derive(Parser)]
#[command(name = "suno-dl")]
#[command(about = "Download media from Suno AI song pages")]
struct Args {
    /// Suno song URL(s), comma-separated
    #[arg(short, long)]
    url: Option<String>,

    /// Suno song ID(s), comma-separated
    #[arg(short = 's', long = "id")]
    song_id: Option<String>,

    /// Path to a file containing one Suno song URL per line
    #[arg(short, long)]
    list: Option<PathBuf>,

    /// Download audio and cover image
    #[arg(short, long)]
    audio: bool,

    /// Download video only
    #[arg(short, long)]
    video: bool,

    /// Download cover image only
    #[arg(short, long)]
    image: bool,

    /// Print the extracted JSON record
    #[arg(short, long)]
    data: bool,

    /// Overwrite existing files
    #[arg(short, long)]
    force: bool,

    /// Directory to save downloads into
    #[arg(long, default_value = "downloads")]
    out_dir: PathBuf,

    /// Save the decoded flight stream next to the downloads
    #[arg(long)]
    save_response: bool,

    /// HTTP timeout in seconds
    #[arg(long, default_value_t = 30)]
    timeout: u64,
}

fn main() {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info")).init();
    let args = Args::parse();

    let urls = match gather_urls(&args) {
        Ok(urls) => urls,
        Err(err) => {
            error!("{err}");
            std::process::exit(2);
        }
    };

    let client = Client::new(Duration::from_secs(args.timeout));
    let mut failures = 0usize;

    for url in &urls {
        let url = url.trim();
        if url.is_empty() {
            continue;
        }
        if let Err(err) = process_url(&client, url, &args) {
            error!("{url}: {err}");
            failures += 1;
        }
    }

    if failures > 0 {
        error!("{failures} of {} URL(s) failed", urls.len());
        std::process::exit(1);
    }
}

/// Collect the work list from --list, --url or --id, falling back to an
/// interactive prompt like the upstream tool.
fn gather_urls(args: &Args) -> Result<Vec<String>> {
    if let Some(ref list) = args.list {
        let file = fs::File::open(list)?;
        let urls = io::BufReader::new(file)
            .lines()
            .collect::<io::Result<Vec<_>>>()?;
        return Ok(urls);
    }
    if let Some(ref raw) = args.url {
        return Ok(raw.split(',').map(str::to_string).collect());
    }
    if let Some(ref ids) = args.song_id {
        return Ok(ids
            .split(',')
            .map(|id| format!("https://suno.com/song/{}", id.trim()))
            .collect());
    }

    print!("Enter Suno song URL: ");
    io::stdout().flush()?;
    let mut line = String::new();
    io::stdin().read_line(&mut line)?;
    Ok(vec![line])
}

fn is_suno_url(url: &str) -> bool {
    Url::parse(url)
        .ok()
        .and_then(|parsed| {
            parsed
                .host_str()
                .map(|host| host == "suno.com" || host.ends_with(".suno.com"))
        })
        .unwrap_or(false)
}

/// Fetch, extract, download and tag one song.
fn process_url(client: &Client, page_url: &str, args: &Args) -> Result<()> {
    if !is_suno_url(page_url) {
        return Err(Error::Fetch {
            url: page_url.to_string(),
            reason: "not a suno.com URL".to_string(),
        });
    }

    let body = client.get(page_url)?;
    let page = encoding::decode_page(&body);

    let options = ExtractOptions {
        url: Some(page_url.to_string()),
        ..ExtractOptions::default()
    };
    let mut record = extract_with_options(&page, &options)?;

    let display_name = record.display_name().unwrap_or("Unknown Artist").to_string();
    let title = record.title().unwrap_or("Untitled").to_string();
    let id = record.id().unwrap_or_default().to_string();
    let audio_url = record.audio_url().unwrap_or_default().to_string();

    let paths = files::OutputPaths::new(&args.out_dir, &display_name, &title, &id);
    fs::create_dir_all(paths.dir())?;

    // Estimate the tempo up front so both the sidecar and the tags carry it.
    let temp_audio = paths.dir().join("temp_audio.mp3");
    client.download(&audio_url, &temp_audio)?;
    let bpm = tempo::estimate_bpm(&temp_audio)?;
    fs::remove_file(&temp_audio)?;
    record.set_metadata("estimated_bpm", json!(format!("{bpm:.3} BPM")));

    write_sidecar(&record, page_url, &paths, args)?;

    if args.save_response {
        fs::write(paths.response(), stream::unify(&page))?;
    }

    let any_flag = args.audio || args.video || args.image;
    let want_image = args.image || args.audio || !any_flag;
    let want_audio = args.audio || !any_flag;
    let want_video = args.video || !any_flag;

    let mut cover: Option<PathBuf> = None;
    if want_image {
        cover = download_image(client, &record, &paths, args.force)?;
    }

    if want_audio {
        download_audio(
            client,
            &record,
            &audio_url,
            &paths,
            cover.as_deref(),
            bpm,
            page_url,
            args.force,
        )?;
    }

    if want_video {
        download_video(client, &record, &paths, args.force)?;
    }

    Ok(())
}

/// JSON sidecar written next to the media files.
#[derive(Serialize)]
struct Sidecar<'a> {
    suno_song_url: &'a str,
    clip: &'a serde_json::Map<String, serde_json::Value>,
}

/// Write the JSON sidecar unless it already exists and --force is off.
fn write_sidecar(record: &Record, page_url: &str, paths: &files::OutputPaths, args: &Args) -> Result<()> {
    let sidecar = Sidecar {
        suno_song_url: page_url,
        clip: record.clip(),
    };
    let rendered = serde_json::to_string_pretty(&sidecar).unwrap_or_default();

    let json_path = paths.json();
    if !json_path.exists() || args.force {
        fs::write(&json_path, &rendered)?;
        info!("wrote {}", json_path.display());
    } else {
        info!("JSON exists, skipping: {}", json_path.display());
    }

    if args.data {
        println!("{rendered}");
    }
    Ok(())
}

fn download_image(
    client: &Client,
    record: &Record,
    paths: &files::OutputPaths,
    force: bool,
) -> Result<Option<PathBuf>> {
    let Some(image_url) = record.image_large_url() else {
        warn!("record has no image_large_url; skipping cover image");
        return Ok(None);
    };

    let image_path = paths.image();
    if image_path.exists() && !force {
        info!("image exists, skipping: {}", image_path.display());
        return Ok(Some(image_path));
    }

    info!("downloading {image_url}");
    client.download(image_url, &image_path)?;
    info!("    downloaded {}", image_path.display());
    Ok(Some(image_path))
}

#[allow(clippy::too_many_arguments)]
fn download_audio(
    client: &Client,
    record: &Record,
    audio_url: &str,
    paths: &files::OutputPaths,
    cover: Option<&Path>,
    bpm: f32,
    page_url: &str,
    force: bool,
) -> Result<()> {
    let audio_path = paths.audio();
    if audio_path.exists() && !force {
        info!("audio exists, skipping: {}", audio_path.display());
        return Ok(());
    }

    info!("downloading {audio_url}");
    client.download(audio_url, &audio_path)?;
    info!("    downloaded {}", audio_path.display());
    info!("    estimated BPM: {bpm:.3}");
    info!("    writing ID3 tags");
    tags::write_tags(&audio_path, record, cover, bpm, page_url)
}

fn download_video(
    client: &Client,
    record: &Record,
    paths: &files::OutputPaths,
    force: bool,
) -> Result<()> {
    let Some(video_url) = record.video_url() else {
        warn!("record has no video_url; skipping video");
        return Ok(());
    };

    let video_path = paths.video();
    if video_path.exists() && !force {
        info!("video exists, skipping: {}", video_path.display());
        return Ok(());
    }

    info!("downloading {video_url}");
    client.download(video_url, &video_path)?;
    info!("    downloaded {}", video_path.display());
    Ok(())
}
