// Flash-Speicher für die Fütterungs-Parameter
//
// Der 24-Byte-Blob liegt roh an PARAMS_FLASH_OFFSET. `Storage::write` von
// esp-storage erledigt Read-Modify-Erase-Write des Sektors selbst.
// Nach dem Schreiben wird zurückgelesen und verglichen (= Commit).

use defmt::warn;
use embedded_storage::{ReadStorage, Storage};
use esp_storage::FlashStorage;
use feeder_core::{FeedParameters, ParameterStore, StorageError};

const BLOB_LEN: usize = FeedParameters::ENCODED_LEN;

/// ParameterStore auf dem internen SPI-Flash
pub struct FlashParameterStore {
    flash: FlashStorage<'static>,
    offset: u32,
}

impl FlashParameterStore {
    pub fn new(flash: FlashStorage<'static>, offset: u32) -> Self {
        Self { flash, offset }
    }
}

impl ParameterStore for FlashParameterStore {
    fn load(&mut self) -> Option<[u8; BLOB_LEN]> {
        let mut bytes = [0u8; BLOB_LEN];
        match self.flash.read(self.offset, &mut bytes) {
            Ok(()) => Some(bytes),
            Err(_) => {
                warn!("Flash: Read at {=u32:#x} failed", self.offset);
                None
            }
        }
    }

    fn save(&mut self, bytes: &[u8; BLOB_LEN]) -> Result<(), StorageError> {
        self.flash
            .write(self.offset, bytes)
            .map_err(|_| StorageError::WriteFailed)?;

        let mut readback = [0u8; BLOB_LEN];
        self.flash
            .read(self.offset, &mut readback)
            .map_err(|_| StorageError::ReadFailed)?;

        if readback != *bytes {
            return Err(StorageError::VerifyFailed);
        }
        Ok(())
    }
}
