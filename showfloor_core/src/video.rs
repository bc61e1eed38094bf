//! Video screen - fallback loop vs. live stream.
//!
//! The SDK tells the scene what to play; the scene owns the screen. Every
//! state entry re-issues the playback configuration and the video material
//! as one [`ScreenConfiguration`], so the visible material is always bound
//! to the source that is actually configured.

use serde::{Deserialize, Serialize};
use showfloor_env::{Collaborator, EntityId, GuideVideo};
use tracing::{debug, info, warn};

use crate::config::SceneConfig;
use crate::signage::{palette, Color4, TextLabel};

/// Which presentation is on screen.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub enum VideoPresentation {
    /// Looping placeholder (default)
    Fallback,

    /// Remote stream selected by the viewer
    Live { url: String },
}

/// Video player settings.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PlaybackConfig {
    pub src: String,
    pub playing: bool,
    pub looping: bool,
    pub volume: f32,
}

/// A texture sampled from a video player entity.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct VideoTexture {
    pub player: EntityId,
}

/// PBR material of the screen surface.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ScreenMaterial {
    pub texture: VideoTexture,
    pub emissive_texture: VideoTexture,
    pub roughness: f32,
    pub metallic: f32,
    pub emissive_color: Color4,
    pub emissive_intensity: f32,
}

impl ScreenMaterial {
    /// Emissive video material sampling `player`.
    pub fn video(player: EntityId) -> Self {
        Self {
            texture: VideoTexture { player },
            emissive_texture: VideoTexture { player },
            roughness: 1.0,
            metallic: 0.0,
            emissive_color: palette::WHITE,
            emissive_intensity: 0.5,
        }
    }
}

/// Playback and material, always applied as a pair.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ScreenConfiguration {
    pub playback: PlaybackConfig,
    pub material: ScreenMaterial,
}

pub const DEFAULT_SCREEN_LABEL: &str = "Click GUIDE to browse channels";

/// Two-state controller for the scene's video screen.
#[derive(Debug, Clone)]
pub struct VideoScreenController {
    screen: EntityId,
    fallback_url: String,
    fallback_volume: f32,
    live_volume: f32,
    state: VideoPresentation,
    applied: ScreenConfiguration,
    label: TextLabel,
    applications: u64,
}

impl VideoScreenController {
    /// Creates the controller and applies the fallback presentation.
    pub fn new(screen: EntityId, config: &SceneConfig) -> Self {
        let mut controller = Self {
            screen,
            fallback_url: config.fallback_video_url.clone(),
            fallback_volume: config.fallback_volume,
            live_volume: config.live_volume,
            state: VideoPresentation::Fallback,
            applied: ScreenConfiguration {
                playback: PlaybackConfig {
                    src: String::new(),
                    playing: false,
                    looping: false,
                    volume: 0.0,
                },
                material: ScreenMaterial::video(screen),
            },
            label: TextLabel::new(DEFAULT_SCREEN_LABEL, palette::CYAN),
            applications: 0,
        };
        controller.enter(VideoPresentation::Fallback);
        controller
    }

    /// The full configuration a presentation maps to.
    pub fn configuration_for(&self, presentation: &VideoPresentation) -> ScreenConfiguration {
        let playback = match presentation {
            VideoPresentation::Fallback => PlaybackConfig {
                src: self.fallback_url.clone(),
                playing: true,
                looping: true,
                volume: self.fallback_volume,
            },
            VideoPresentation::Live { url } => PlaybackConfig {
                src: url.clone(),
                playing: true,
                looping: false,
                volume: self.live_volume,
            },
        };
        ScreenConfiguration {
            playback,
            material: ScreenMaterial::video(self.screen),
        }
    }

    /// `onVideoPlay(url)`: switch to the live stream.
    ///
    /// An empty URL is ignored and the current presentation is kept.
    pub fn play(&mut self, url: &str) -> bool {
        let url = url.trim();
        if url.is_empty() {
            warn!("play signal without a URL; keeping current presentation");
            return false;
        }
        self.enter(VideoPresentation::Live { url: url.to_string() });
        true
    }

    /// `onVideoStop()`: back to the fallback loop.
    pub fn stop(&mut self) {
        self.enter(VideoPresentation::Fallback);
    }

    /// `onVideoSelected(video)`: label the screen and notify the SDK.
    ///
    /// Sets the guide's "now playing" marker and starts watch-time tracking
    /// for the video's channel, each only if that handle is present.
    pub fn select<C>(&mut self, video: &GuideVideo, collaborator: Option<&C>)
    where
        C: Collaborator + ?Sized,
    {
        self.label.text = video.name.clone();

        let Some(collaborator) = collaborator else {
            debug!(video = %video.id, "video selected before SDK client exists");
            return;
        };

        match collaborator.guide() {
            Some(guide) => guide.set_current_video_id(&video.id),
            None => debug!("guide UI not available; skipping now-playing marker"),
        }

        let channel = video.channel_id.as_deref().filter(|c| !c.is_empty());
        match (collaborator.heartbeat(), channel) {
            (Some(heartbeat), Some(channel)) => heartbeat.start_watching(channel),
            (None, Some(_)) => debug!("heartbeat not available; watch time not tracked"),
            _ => {}
        }
    }

    fn enter(&mut self, presentation: VideoPresentation) {
        self.applied = self.configuration_for(&presentation);
        self.applications += 1;
        info!(
            src = %self.applied.playback.src,
            looping = self.applied.playback.looping,
            "video screen configured"
        );
        self.state = presentation;
    }

    pub fn state(&self) -> &VideoPresentation {
        &self.state
    }

    /// The configuration currently applied to the screen.
    pub fn applied(&self) -> &ScreenConfiguration {
        &self.applied
    }

    pub fn label(&self) -> &TextLabel {
        &self.label
    }

    /// Number of times a configuration was (re)applied.
    pub fn applications(&self) -> u64 {
        self.applications
    }

    pub fn screen(&self) -> EntityId {
        self.screen
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::test_support::FakeCollaborator;

    fn controller() -> VideoScreenController {
        VideoScreenController::new(EntityId::from_seed(77), &SceneConfig::default())
    }

    #[test]
    fn test_starts_in_fallback() {
        let screen = controller();
        assert_eq!(screen.state(), &VideoPresentation::Fallback);
        let playback = &screen.applied().playback;
        assert_eq!(playback.src, "https://media.thestatic.tv/fallback-loop.mp4");
        assert!(playback.looping && playback.playing);
        assert_eq!(playback.volume, 0.5);
        assert_eq!(screen.applications(), 1);
        assert_eq!(screen.label().text, DEFAULT_SCREEN_LABEL);
    }

    #[test]
    fn test_play_goes_live() {
        let mut screen = controller();
        assert!(screen.play("https://x/a.mp4"));
        assert_eq!(
            screen.state(),
            &VideoPresentation::Live {
                url: "https://x/a.mp4".to_string()
            }
        );
        let playback = &screen.applied().playback;
        assert!(!playback.looping);
        assert_eq!(playback.volume, 0.8);
        assert_eq!(playback.src, "https://x/a.mp4");
    }

    #[test]
    fn test_play_then_stop_restores_exact_fallback() {
        let mut screen = controller();
        let initial = screen.applied().clone();

        screen.play("https://x/a.mp4");
        screen.stop();

        assert_eq!(screen.state(), &VideoPresentation::Fallback);
        assert_eq!(screen.applied(), &initial);
    }

    #[test]
    fn test_material_always_bound_to_screen() {
        let mut screen = controller();
        screen.play("https://x/a.mp4");
        let material = &screen.applied().material;
        assert_eq!(material.texture.player, screen.screen());
        assert_eq!(material.emissive_texture.player, screen.screen());
        assert_eq!(
            screen.applied(),
            &screen.configuration_for(screen.state())
        );
    }

    #[test]
    fn test_empty_url_is_ignored() {
        let mut screen = controller();
        assert!(!screen.play("   "));
        assert_eq!(screen.state(), &VideoPresentation::Fallback);
        assert_eq!(screen.applications(), 1);
    }

    #[test]
    fn test_select_updates_label_and_sdk() {
        let collaborator = FakeCollaborator::full();
        let mut screen = controller();
        let video = GuideVideo::new("v-42", "Launch Party").with_channel("chan-9");

        screen.select(&video, Some(&collaborator));

        assert_eq!(screen.label().text, "Launch Party");
        assert_eq!(collaborator.current_video_id().as_deref(), Some("v-42"));
        assert_eq!(collaborator.watched_channels(), vec!["chan-9".to_string()]);
    }

    #[test]
    fn test_select_without_channel_skips_heartbeat() {
        let collaborator = FakeCollaborator::full();
        let mut screen = controller();
        screen.select(&GuideVideo::new("v-1", "Replay"), Some(&collaborator));
        assert!(collaborator.watched_channels().is_empty());
        assert_eq!(collaborator.current_video_id().as_deref(), Some("v-1"));
    }

    #[test]
    fn test_select_with_missing_handles_only_labels() {
        let collaborator = FakeCollaborator::bare();
        let mut screen = controller();
        screen.select(&GuideVideo::new("v-1", "Replay").with_channel("c"), Some(&collaborator));
        assert_eq!(screen.label().text, "Replay");

        screen.select::<FakeCollaborator>(&GuideVideo::new("v-2", "Encore"), None);
        assert_eq!(screen.label().text, "Encore");
    }
}
