use super::FaviconError;
use image::imageops::FilterType;
use image::{ImageFormat, RgbaImage};
use std::fmt;
use std::path::Path;
use std::sync::Arc;
use tokio::sync::watch;

/// Edge length icons are scaled to fit
pub const DEFAULT_ICON_SIZE: u32 = 16;

/// A decoded icon frame as RGBA8 pixels
#[derive(Clone, PartialEq, Eq)]
pub struct Icon {
    pub width: u32,
    pub height: u32,
    pub rgba: Vec<u8>,
}

impl fmt::Debug for Icon {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Icon")
            .field("width", &self.width)
            .field("height", &self.height)
            .field("bytes", &self.rgba.len())
            .finish()
    }
}

impl Icon {
    pub fn save_png(&self, path: &Path) -> Result<(), FaviconError> {
        let image = RgbaImage::from_raw(self.width, self.height, self.rgba.clone())
            .ok_or(FaviconError::Empty)?;
        image.save_with_format(path, ImageFormat::Png)?;
        Ok(())
    }
}

/// Decode the first frame of an ICO stream, scaled to fit `size` x `size`
pub fn decode_icon(bytes: &[u8], size: u32) -> Result<Icon, FaviconError> {
    if bytes.is_empty() {
        return Err(FaviconError::Empty);
    }

    let mut image = image::load_from_memory_with_format(bytes, ImageFormat::Ico)?;
    if image.width() == 0 || image.height() == 0 {
        return Err(FaviconError::Empty);
    }
    if image.width() != size || image.height() != size {
        image = image.resize(size, size, FilterType::Triangle);
    }

    let rgba = image.to_rgba8();
    Ok(Icon {
        width: rgba.width(),
        height: rgba.height(),
        rgba: rgba.into_raw(),
    })
}

/// Shared, observable slot for a site's icon.
///
/// Starts out as a placeholder and is filled in place once the background
/// fetch succeeds. Every clone points at the same slot.
#[derive(Clone)]
pub struct IconHandle {
    slot: Arc<watch::Sender<Option<Arc<Icon>>>>,
}

impl IconHandle {
    pub fn placeholder() -> Self {
        let (slot, _) = watch::channel(None);
        Self { slot: Arc::new(slot) }
    }

    pub fn get(&self) -> Option<Arc<Icon>> {
        self.slot.borrow().clone()
    }

    pub fn is_placeholder(&self) -> bool {
        self.slot.borrow().is_none()
    }

    /// Receive a notification each time the icon is replaced
    pub fn subscribe(&self) -> watch::Receiver<Option<Arc<Icon>>> {
        self.slot.subscribe()
    }

    pub fn same_handle(&self, other: &IconHandle) -> bool {
        Arc::ptr_eq(&self.slot, &other.slot)
    }

    // Stores even when nobody is subscribed.
    pub(crate) fn fill(&self, icon: Icon) {
        self.slot.send_replace(Some(Arc::new(icon)));
    }
}

impl Default for IconHandle {
    fn default() -> Self {
        Self::placeholder()
    }
}

impl fmt::Debug for IconHandle {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("IconHandle")
            .field("icon", &self.get())
            .finish()
    }
}
