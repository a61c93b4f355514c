use super::EnrichmentPipeline;
use crate::server::metrics::record_enrichment_updates;
use crate::spotify::SpotifyArtist;
use anyhow::{Context, Result};
use tracing::{debug, info, warn};

#[derive(Debug, Default, Clone, PartialEq, Eq)]
pub struct SpotifyEnrichmentReport {
    pub processed: usize,
    pub updated: usize,
    pub not_found: usize,
    pub failed: usize,
    pub genres_linked: usize,
}

impl EnrichmentPipeline {
    /// Resolves a Spotify id and raw genres for up to `limit` artists that
    /// have none, searching by title and trusting the first hit.
    pub async fn enrich_spotify(
        &self,
        access_token: &str,
        limit: usize,
    ) -> Result<SpotifyEnrichmentReport> {
        let artists = self
            .store
            .get_artists_missing_spotify_id(limit)
            .context("Failed to get artists missing a Spotify id")?;

        let mut report = SpotifyEnrichmentReport {
            processed: artists.len(),
            ..Default::default()
        };
        info!("Resolving Spotify ids for {} artists", artists.len());

        for artist in &artists {
            let hit = match self.spotify.search_artist(access_token, &artist.title).await {
                Ok(Some(hit)) => hit,
                Ok(None) => {
                    debug!("No Spotify match for {}", artist.title);
                    report.not_found += 1;
                    continue;
                }
                Err(e) => {
                    warn!("Spotify search failed for {}: {}", artist.title, e);
                    report.failed += 1;
                    continue;
                }
            };

            match self.apply_spotify_hit(artist.id, &hit) {
                Ok(linked) => {
                    debug!(
                        "Linked {} to Spotify artist {} with {} new genres",
                        artist.title, hit.id, linked
                    );
                    report.updated += 1;
                    report.genres_linked += linked;
                }
                Err(e) => {
                    warn!("Failed to store Spotify data for {}: {:#}", artist.title, e);
                    report.failed += 1;
                }
            }
        }

        record_enrichment_updates("spotify", report.updated);
        info!(
            "Spotify enrichment complete: {} updated, {} not found, {} failed, {} genres linked",
            report.updated, report.not_found, report.failed, report.genres_linked
        );
        Ok(report)
    }

    fn apply_spotify_hit(&self, artist_id: i64, hit: &SpotifyArtist) -> Result<usize> {
        self.store.set_artist_spotify_id(artist_id, &hit.id)?;
        let mut linked = 0;
        for genre in &hit.genres {
            let outcome = self
                .store
                .add_genre_to_artist(artist_id, genre)
                .with_context(|| format!("Failed to add genre {}", genre))?;
            if outcome.association_created {
                linked += 1;
            }
        }
        Ok(linked)
    }
}

#[cfg(test)]
mod tests {
    use crate::enrichment::test_support::*;
    use crate::taxonomy::TaxonomyStore;

    #[tokio::test]
    async fn zero_limit_updates_nothing() {
        let fixture = Fixture::new();
        fixture.store.create_artist("Alvvays", "Toronto", 11).unwrap();
        fixture.spotify.add_artist("Alvvays", "sp-1", &["indie pop"]);

        let report = fixture.pipeline().enrich_spotify("token", 0).await.unwrap();

        assert_eq!(report.updated, 0);
        assert_eq!(fixture.spotify.search_count(), 0);
        assert_eq!(
            fixture.store.get_artists_missing_spotify_id(10).unwrap().len(),
            1
        );
    }

    #[tokio::test]
    async fn stores_first_hit_and_its_genres() {
        let fixture = Fixture::new();
        let artist = fixture.store.create_artist("Alvvays", "Toronto", 11).unwrap();
        fixture
            .spotify
            .add_artist("Alvvays", "sp-1", &["indie pop", "dream pop", "indie pop"]);

        let report = fixture.pipeline().enrich_spotify("token", 5).await.unwrap();

        assert_eq!(report.updated, 1);
        assert_eq!(report.genres_linked, 2);
        let stored = fixture.store.get_artist(artist.id).unwrap().unwrap();
        assert_eq!(stored.spotify_id.as_deref(), Some("sp-1"));
        assert_eq!(fixture.store.get_unmapped_artist_genres(10).unwrap().len(), 2);
    }

    #[tokio::test]
    async fn failures_are_skipped_and_not_counted() {
        let fixture = Fixture::new();
        fixture.store.create_artist("Broken", "Toronto", 10).unwrap();
        fixture.store.create_artist("Unknown", "Toronto", 11).unwrap();
        fixture.store.create_artist("Metric", "Toronto", 12).unwrap();
        fixture.spotify.fail_search_for("Broken");
        fixture.spotify.add_artist("Metric", "sp-3", &["indie rock"]);

        let report = fixture.pipeline().enrich_spotify("token", 10).await.unwrap();

        assert_eq!(report.processed, 3);
        assert_eq!(report.failed, 1);
        assert_eq!(report.not_found, 1);
        assert_eq!(report.updated, 1);
        assert_eq!(fixture.spotify.search_count(), 3);
    }
}
