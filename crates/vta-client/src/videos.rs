//! Turning ranked evidence into lecture-video links

use crate::protocol::Evidence;

/// At most this many links accompany an answer.
const MAX_LINKS: usize = 3;

/// A position in a lecture video worth jumping to.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct VideoLink {
  pub video_id: String,
  pub start_secs: u64,
}

impl VideoLink {
  pub fn url(&self) -> String {
    format!("https://www.youtube.com/watch?v={}&t={}s", self.video_id, self.start_secs)
  }
}

/// Derive the links shown under an answer: take the three best-scoring
/// passages, then keep one link per video. Start offsets truncate to whole
/// seconds.
pub fn related_videos(evidence: &[Evidence]) -> Vec<VideoLink> {
  let mut ranked: Vec<&Evidence> = evidence.iter().collect();
  ranked.sort_by(|a, b| b.score.partial_cmp(&a.score).unwrap_or(std::cmp::Ordering::Equal));

  let mut links: Vec<VideoLink> = Vec::new();
  for entry in ranked.into_iter().take(MAX_LINKS) {
    if links.iter().any(|link| link.video_id == entry.metadata.video) {
      continue;
    }
    links.push(VideoLink {
      video_id: entry.metadata.video.clone(),
      start_secs: entry.metadata.start as u64,
    });
  }

  links
}
