//! Telemetry commands: downlink the status snapshot or a payload sample,
//! and render a received status buffer.

use super::{CmdStatus, CommandContext};
use crate::codec::{decode_prefix, FrameEncode};
use crate::frame::{
    DestinationEnvelope, FrameKind, TelemetryFrame, FRAME_MAX_LEN, FRAME_PAYLOAD_CAPACITY,
};
use crate::params::{parse_param_bytes, ParamSchema, ParsedArgs};
use crate::registry::{CommandRegistry, RegistryError};
use crate::telemetry::{select_payload, Selection, StatusSnapshot};
use tracing::{debug, error, info, warn};

pub const CMD_SEND_STATUS: &str = "send_status";
pub const CMD_PARSE_STATUS: &str = "tm_parse_status";
pub const CMD_SEND_PAYLOAD: &str = "send_payload";

/// Register the telemetry commands. Call once, before `activate`.
pub fn tm_init(registry: &mut CommandRegistry) -> Result<(), RegistryError> {
    registry.register(CMD_SEND_STATUS, tm_send_status, ParamSchema::from_descriptor("%u")?, 1)?;
    registry.register(CMD_PARSE_STATUS, tm_parse_status, ParamSchema::raw(), 0)?;
    registry.register(CMD_SEND_PAYLOAD, tm_send_pay_data, ParamSchema::from_descriptor("%u %d")?, 2)?;
    Ok(())
}

/// `send_status <node>`: downlink the current status snapshot.
pub fn tm_send_status(
    ctx: &mut CommandContext<'_>,
    schema: &ParamSchema,
    params: Option<&[u8]>,
    nparams: usize,
) -> CmdStatus {
    let args = match parse_param_bytes(schema, params, nparams) {
        Ok(args) => args,
        Err(e) => return CmdStatus::from(&e),
    };
    let Some(node) = destination(ctx, &args) else {
        return CmdStatus::Fail;
    };

    let status = ctx.store.status_snapshot();
    debug!(?status, "current status");

    // The whole status snapshot must fit inside one frame
    debug!("sizeof(status) = {}", StatusSnapshot::ENCODED_LEN);
    debug!("sizeof(frame) = {}", FRAME_MAX_LEN);
    debug!("sizeof(frame.data) = {}", FRAME_PAYLOAD_CAPACITY);
    let frame = TelemetryFrame::pack_encoded(FrameKind::Status, &status);

    downlink(ctx, &DestinationEnvelope::new(node, frame))
}

/// `tm_parse_status <bytes>`: render a status snapshot received as raw bytes.
///
/// Nothing is transmitted. Bytes past the snapshot are ignored, so a whole
/// frame payload can be handed over.
pub fn tm_parse_status(
    ctx: &mut CommandContext<'_>,
    _schema: &ParamSchema,
    params: Option<&[u8]>,
    _nparams: usize,
) -> CmdStatus {
    let Some(bytes) = params else {
        error!("params is null!");
        return CmdStatus::Error;
    };

    let status: StatusSnapshot = match decode_prefix(bytes) {
        Ok(status) => status,
        Err(e) => {
            warn!(len = bytes.len(), "cannot parse status: {}", e);
            return CmdStatus::Fail;
        }
    };

    if write!(ctx.console, "{status}").is_err() {
        return CmdStatus::Fail;
    }
    CmdStatus::Ok
}

/// `send_payload <node> <payload>`: downlink the latest sample of a payload kind.
///
/// An unknown payload kind still sends a zeroed frame tagged with that kind,
/// unless the configuration rejects it.
pub fn tm_send_pay_data(
    ctx: &mut CommandContext<'_>,
    schema: &ParamSchema,
    params: Option<&[u8]>,
    nparams: usize,
) -> CmdStatus {
    let args = match parse_param_bytes(schema, params, nparams) {
        Ok(args) => args,
        Err(e) => return CmdStatus::from(&e),
    };
    let Some(node) = destination(ctx, &args) else {
        return CmdStatus::Fail;
    };

    let payload = match args.signed(1) {
        Ok(payload) => payload,
        Err(e) => {
            warn!("Invalid args! {}", e);
            return CmdStatus::Fail;
        }
    };
    let kind = match FrameKind::payload(payload) {
        Ok(kind) => kind,
        Err(e) => {
            warn!("Invalid args! {}", e);
            return CmdStatus::Fail;
        }
    };

    let selection = match select_payload(ctx.store, payload) {
        Ok(selection) => selection,
        Err(e) => {
            warn!(payload, "payload sample unavailable: {}", e);
            return CmdStatus::Fail;
        }
    };
    if matches!(selection, Selection::Unknown(_)) && ctx.config.reject_unknown_payload {
        warn!(payload, "unknown payload kind");
        return CmdStatus::Fail;
    }

    let frame = selection.into_frame(kind);
    downlink(ctx, &DestinationEnvelope::new(node, frame))
}

fn destination(ctx: &CommandContext<'_>, args: &ParsedArgs) -> Option<u8> {
    let raw = match args.unsigned(0) {
        Ok(raw) => raw,
        Err(e) => {
            warn!("Invalid args! {}", e);
            return None;
        }
    };

    let node = ctx.config.destination_node(raw);
    if node.is_none() {
        warn!(node = raw, "destination node out of range");
    }
    node
}

fn downlink(ctx: &mut CommandContext<'_>, envelope: &DestinationEnvelope) -> CmdStatus {
    let bytes = envelope.to_bytes();
    match ctx.transport.send(&ctx.config.channel, &bytes, ctx.config.flags) {
        Ok(()) => {
            info!(node = envelope.node, kind = %envelope.frame.kind, "frame sent");
            CmdStatus::Ok
        }
        Err(e) => {
            error!(node = envelope.node, "transport failed: {}", e);
            CmdStatus::Fail
        }
    }
}
