use serde::{Deserialize, Serialize};
use serde_json::{json, Map, Value};
use shared::{
    domain::{Album, MediaItem, MediaKind},
    protocol::{RpcAction, RpcResponse},
};

use crate::actions::PhoneActions;

pub const DEFAULT_MEDIA_PAGE: u32 = 20;

#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct MediaState {
    pub photos: Vec<MediaItem>,
    pub videos: Vec<MediaItem>,
    pub voice_recordings: Vec<MediaItem>,
    pub albums: Vec<Album>,
    pub current_album: Option<Album>,
    pub is_recording: bool,
    pub loading: bool,
    pub error: Option<String>,
}

#[derive(Debug, Clone, PartialEq)]
pub enum MediaMutation {
    SetItems(MediaKind, Vec<MediaItem>),
    AddItem(MediaKind, MediaItem),
    RemoveItem(MediaKind, i64),
    SetAlbums(Vec<Album>),
    AddAlbum(Album),
    UpdateAlbum {
        album_id: i64,
        updates: Map<String, Value>,
    },
    RemoveAlbum(i64),
    SetCurrentAlbum(Option<Album>),
    SetRecording(bool),
    SetLoading(bool),
    SetError(Option<String>),
}

impl MediaState {
    pub fn apply(&mut self, mutation: MediaMutation) {
        match mutation {
            MediaMutation::SetItems(kind, items) => *self.items_mut(kind) = items,
            MediaMutation::AddItem(kind, item) => self.items_mut(kind).insert(0, item),
            MediaMutation::RemoveItem(kind, id) => {
                self.items_mut(kind).retain(|m| m.id != id)
            }
            MediaMutation::SetAlbums(albums) => self.albums = albums,
            MediaMutation::AddAlbum(album) => self.albums.push(album),
            MediaMutation::UpdateAlbum { album_id, updates } => {
                if let Some(album) = self.albums.iter_mut().find(|a| a.id == album_id) {
                    album.merge(updates);
                }
            }
            MediaMutation::RemoveAlbum(id) => self.albums.retain(|a| a.id != id),
            MediaMutation::SetCurrentAlbum(album) => self.current_album = album,
            MediaMutation::SetRecording(recording) => self.is_recording = recording,
            MediaMutation::SetLoading(loading) => self.loading = loading,
            MediaMutation::SetError(error) => self.error = error,
        }
    }

    pub fn items(&self, kind: MediaKind) -> &[MediaItem] {
        match kind {
            MediaKind::Photo => &self.photos,
            MediaKind::Video => &self.videos,
            MediaKind::Audio => &self.voice_recordings,
        }
    }

    fn items_mut(&mut self, kind: MediaKind) -> &mut Vec<MediaItem> {
        match kind {
            MediaKind::Photo => &mut self.photos,
            MediaKind::Video => &mut self.videos,
            MediaKind::Audio => &mut self.voice_recordings,
        }
    }

    pub fn item(&self, kind: MediaKind, id: i64) -> Option<&MediaItem> {
        self.items(kind).iter().find(|m| m.id == id)
    }

    pub fn album(&self, id: i64) -> Option<&Album> {
        self.albums.iter().find(|a| a.id == id)
    }

    pub fn total_media_count(&self) -> usize {
        self.photos.len() + self.videos.len() + self.voice_recordings.len()
    }
}

#[derive(Debug, Default, Deserialize)]
#[serde(default)]
struct MediaPage {
    photos: Vec<MediaItem>,
    videos: Vec<MediaItem>,
    audio: Vec<MediaItem>,
}

impl MediaPage {
    fn take(&mut self, kind: MediaKind) -> Vec<MediaItem> {
        std::mem::take(match kind {
            MediaKind::Photo => &mut self.photos,
            MediaKind::Video => &mut self.videos,
            MediaKind::Audio => &mut self.audio,
        })
    }
}

impl PhoneActions {
    async fn media_call(&self, action: RpcAction, payload: Value, fallback: &str) -> RpcResponse {
        self.store().commit(MediaMutation::SetLoading(true));
        self.store().commit(MediaMutation::SetError(None));
        let response = self.call(action, payload).await;
        if !response.success {
            let error = response
                .error
                .clone()
                .unwrap_or_else(|| fallback.to_string());
            self.store().commit(MediaMutation::SetError(Some(error)));
        }
        self.store().commit(MediaMutation::SetLoading(false));
        response
    }

    pub async fn fetch_media(
        &self,
        kind: Option<MediaKind>,
        limit: u32,
        offset: u32,
    ) -> RpcResponse {
        let payload = json!({ "mediaType": kind, "limit": limit, "offset": offset });
        let response = self
            .media_call(RpcAction::GetMedia, payload, "Failed to fetch media")
            .await;
        if response.success {
            let mut page: MediaPage = response.field("data").unwrap_or_default();
            for wanted in MediaKind::ALL {
                if kind.map_or(true, |k| k == wanted) {
                    self.store()
                        .commit(MediaMutation::SetItems(wanted, page.take(wanted)));
                }
            }
        }
        response
    }

    pub async fn delete_media(&self, kind: MediaKind, media_id: i64) -> RpcResponse {
        let payload = json!({ "mediaId": media_id, "mediaType": kind });
        let fallback = match kind {
            MediaKind::Photo => "Failed to delete photo",
            MediaKind::Video => "Failed to delete video",
            MediaKind::Audio => "Failed to delete recording",
        };
        let response = self
            .media_call(RpcAction::DeleteMedia, payload, fallback)
            .await;
        if response.success {
            self.store().commit(MediaMutation::RemoveItem(kind, media_id));
        }
        response
    }

    pub async fn bulk_delete_media(&self, media_ids: &[i64]) -> RpcResponse {
        let response = self
            .media_call(
                RpcAction::BulkDeleteMedia,
                json!({ "mediaIds": media_ids }),
                "Failed to delete media",
            )
            .await;
        if response.success {
            for &id in media_ids {
                for kind in MediaKind::ALL {
                    self.store().commit(MediaMutation::RemoveItem(kind, id));
                }
            }
        }
        response
    }

    pub async fn fetch_albums(&self) -> RpcResponse {
        let response = self
            .media_call(RpcAction::GetAlbums, json!({}), "Failed to fetch albums")
            .await;
        if response.success {
            let albums: Vec<Album> = response.field("data").unwrap_or_default();
            self.store().commit(MediaMutation::SetAlbums(albums));
        }
        response
    }

    pub async fn create_album(&self, name: &str, cover_media_id: Option<i64>) -> RpcResponse {
        let payload = json!({ "name": name, "coverMediaId": cover_media_id });
        let response = self
            .media_call(RpcAction::CreateAlbum, payload, "Failed to create album")
            .await;
        if let Some(album) = response.success_field::<Album>("data") {
            self.store().commit(MediaMutation::AddAlbum(album));
        }
        response
    }

    pub async fn update_album(&self, album_id: i64, updates: Map<String, Value>) -> RpcResponse {
        let payload = json!({ "albumId": album_id, "updates": updates });
        let response = self
            .media_call(RpcAction::UpdateAlbum, payload, "Failed to update album")
            .await;
        if response.success {
            self.store()
                .commit(MediaMutation::UpdateAlbum { album_id, updates });
        }
        response
    }

    pub async fn delete_album(&self, album_id: i64) -> RpcResponse {
        let response = self
            .media_call(
                RpcAction::DeleteAlbum,
                json!({ "albumId": album_id }),
                "Failed to delete album",
            )
            .await;
        if response.success {
            self.store().commit(MediaMutation::RemoveAlbum(album_id));
        }
        response
    }

    pub async fn add_media_to_album(&self, album_id: i64, media_ids: &[i64]) -> RpcResponse {
        let payload = json!({ "albumId": album_id, "mediaIds": media_ids });
        self.media_call(
            RpcAction::AddMediaToAlbum,
            payload,
            "Failed to add media to album",
        )
        .await
    }

    pub async fn remove_media_from_album(&self, album_id: i64, media_ids: &[i64]) -> RpcResponse {
        let payload = json!({ "albumId": album_id, "mediaIds": media_ids });
        self.media_call(
            RpcAction::RemoveMediaFromAlbum,
            payload,
            "Failed to remove media from album",
        )
        .await
    }

    pub async fn fetch_album_media(&self, album_id: i64) -> Vec<MediaItem> {
        let response = self
            .media_call(
                RpcAction::GetAlbumMedia,
                json!({ "albumId": album_id }),
                "Failed to fetch album media",
            )
            .await;
        if response.success {
            response.field("data").unwrap_or_default()
        } else {
            Vec::new()
        }
    }

    pub async fn set_album_cover(&self, album_id: i64, media_id: i64) -> RpcResponse {
        let payload = json!({ "albumId": album_id, "mediaId": media_id });
        let response = self
            .media_call(RpcAction::SetAlbumCover, payload, "Failed to set album cover")
            .await;
        if response.success {
            let mut updates = Map::new();
            updates.insert("cover_media_id".to_string(), json!(media_id));
            self.store()
                .commit(MediaMutation::UpdateAlbum { album_id, updates });
        }
        response
    }
}
