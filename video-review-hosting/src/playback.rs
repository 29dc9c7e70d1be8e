use parking_lot::Mutex;

use crate::config::HostingConfig;

/// Something that can display a hosted asset.
pub trait PlaybackTarget: Send + Sync {
    fn show(&self, asset_id: &str);
}

/// Delivery URL for a hosted video, always requested as mp4.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct VideoSource {
    pub public_id: String,
    pub url: String,
}

impl VideoSource {
    pub fn new(delivery_base_url: &str, cloud_name: &str, public_id: &str) -> Self {
        Self {
            public_id: public_id.to_string(),
            url: format!(
                "{}/{}/video/upload/{}.mp4",
                delivery_base_url.trim_end_matches('/'),
                cloud_name,
                public_id
            ),
        }
    }
}

/// Resolves asset ids to sources and keeps the one on screen.
pub struct VideoPlayer {
    delivery_base_url: String,
    cloud_name: String,
    current: Mutex<Option<VideoSource>>,
}

impl VideoPlayer {
    pub fn new(config: &HostingConfig) -> Self {
        Self {
            delivery_base_url: config.delivery_base_url.clone(),
            cloud_name: config.cloud_name.clone(),
            current: Mutex::new(None),
        }
    }

    pub fn source_for(&self, asset_id: &str) -> VideoSource {
        VideoSource::new(&self.delivery_base_url, &self.cloud_name, asset_id)
    }

    /// The source most recently shown.
    pub fn current(&self) -> Option<VideoSource> {
        self.current.lock().clone()
    }
}

impl PlaybackTarget for VideoPlayer {
    fn show(&self, asset_id: &str) {
        let source = self.source_for(asset_id);
        log::info!("playing {}", source.url);
        *self.current.lock() = Some(source);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn builds_mp4_delivery_url() {
        let source = VideoSource::new("https://res.cloudinary.com/", "demo", "abc123");
        assert_eq!(source.url, "https://res.cloudinary.com/demo/video/upload/abc123.mp4");
    }

    #[test]
    fn player_remembers_last_asset() {
        let config = HostingConfig {
            cloud_name: "demo".into(),
            ..Default::default()
        };
        let player = VideoPlayer::new(&config);
        assert!(player.current().is_none());

        player.show("first");
        player.show("second");
        assert_eq!(player.current().unwrap().public_id, "second");
    }
}
