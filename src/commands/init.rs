use crate::config::{config_path_in, CONFIG_FILE_NAME};
use anyhow::{Context, Result};
use std::fs;
use std::path::{Path, PathBuf};

const DEFAULT_CONFIG: &str = r#"# siterate configuration

# user_agent = "Mozilla/5.0 ... siterate/0.3.0"
connect_timeout_secs = 10
read_timeout_secs = 20
probe_timeout_secs = 20
similarity_threshold = 0.99999
blocked_redirect_hosts = ["www.facebook.com", "www.denic.de", "sedo.com"]
default_charset = "iso-8859-1"
green_power_endpoint = "http://api.thegreenwebfoundation.org/greencheck/"

viewport_sizes = [
    { width = 360, height = 640 },
    { width = 768, height = 1024 },
    { width = 1024, height = 768 },
    { width = 1920, height = 1080 },
]

[browser_retry]
max_retries = 3
base_delay_ms = 500
strategy = "exponential"

[generator]
gcms_ip = "91.102.13.20"

[rating]
fast_response_ms = 100
slow_response_ms = 1000
small_payload_bytes = 994000
large_payload_bytes = 1496000
few_requests = 28
many_requests = 38
specific_font = "arvo"
contact_link_text = "kontakt"
social_media_hosts = ["facebook.com", "twitter.com", "instagram.com", "gruene.social"]
"#;

pub fn init_config(force: bool) -> Result<()> {
    let dir = std::env::current_dir().context("Failed to determine current directory")?;
    init_config_in(&dir, force)?;
    Ok(())
}

pub fn init_config_in(dir: &Path, force: bool) -> Result<PathBuf> {
    let config_path = config_path_in(dir);

    if config_path.exists() && !force {
        anyhow::bail!("Configuration file already exists. Use --force to overwrite.");
    }

    fs::write(&config_path, DEFAULT_CONFIG)
        .with_context(|| format!("Failed to write {}", config_path.display()))?;
    println!("Created {} configuration file", CONFIG_FILE_NAME);

    Ok(config_path)
}
