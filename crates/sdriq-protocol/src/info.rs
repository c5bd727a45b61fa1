//! Device identity resolution.

use tracing::{debug, info};

use sdriq_core::types::DeviceInfo;
use sdriq_core::Result;

use crate::commands;
use crate::engine::ControlEngine;
use crate::items::{
    CI_FIRMWARE_VERSION, CI_INTERFACE_VERSION, CI_TARGET_NAME, CI_TARGET_SERIAL, FW_VER_BOOT_CODE,
    FW_VER_FIRMWARE,
};

/// Read the device's identity in five transactions.
///
/// Queries name, serial, interface version, boot-code version, and firmware
/// version in that order. Any transaction failure aborts the whole resolve;
/// there is no partial result. Version replies too short to carry a value
/// leave the corresponding field at its default, which some boot-mode
/// firmware revisions are known to produce.
pub async fn resolve_device_info(engine: &mut ControlEngine) -> Result<DeviceInfo> {
    let mut info = DeviceInfo::default();

    let reply = engine.request_item(CI_TARGET_NAME).await?;
    info.model = commands::parse_string(&reply.data);

    let reply = engine.request_item(CI_TARGET_SERIAL).await?;
    info.serial = commands::parse_string(&reply.data);

    let reply = engine.request_item(CI_INTERFACE_VERSION).await?;
    match commands::parse_interface_version(&reply.data) {
        Some(version) => info.interface_version = version,
        None => debug!("interface version reply undersized, leaving default"),
    }

    let reply = engine
        .request_item_with(CI_FIRMWARE_VERSION, &[FW_VER_BOOT_CODE])
        .await?;
    match commands::parse_firmware_version(&reply.data) {
        Some(version) => info.bootcode_version = version,
        None => debug!("boot-code version reply undersized, leaving default"),
    }

    let reply = engine
        .request_item_with(CI_FIRMWARE_VERSION, &[FW_VER_FIRMWARE])
        .await?;
    match commands::parse_firmware_version(&reply.data) {
        Some(version) => info.firmware_version = version,
        None => debug!("firmware version reply undersized, leaving default"),
    }

    info!(
        model = %info.model,
        serial = %info.serial,
        interface = info.interface_version,
        bootcode = info.bootcode_version,
        firmware = info.firmware_version,
        "device identified"
    );
    Ok(info)
}
