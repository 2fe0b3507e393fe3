//! Protocol constants and frame helpers.

use std::io::{Read, Write};

use yao_garble_core::Label;

use crate::{
    error::{PartyError, ProtocolError},
    transport::Channel,
};

/// Opcode requesting one oblivious transfer round.
pub(crate) const OP_OT: u32 = 1;
/// Opcode starting the result reveal.
pub(crate) const OP_RESULT: u32 = 2;

/// Size of the session RSA modulus.
pub(crate) const MODULUS_BITS: usize = 2048;

/// Receives a label frame, rejecting any width other than the fixed label
/// width.
pub(crate) fn recv_label<R: Read, W: Write>(
    channel: &mut Channel<R, W>,
) -> Result<Label, PartyError> {
    let bytes = channel.recv_bytes()?;
    Label::try_from(bytes.as_slice())
        .map_err(|_| ProtocolError::InvalidLabelLength(bytes.len()).into())
}

/// Receives a masked-label frame of the fixed label width.
pub(crate) fn recv_masked<R: Read, W: Write>(
    channel: &mut Channel<R, W>,
) -> Result<[u8; 16], PartyError> {
    let bytes = channel.recv_bytes()?;
    <[u8; 16]>::try_from(bytes.as_slice())
        .map_err(|_| ProtocolError::InvalidLabelLength(bytes.len()).into())
}
