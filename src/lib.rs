// SPDX-License-Identifier: MIT OR Apache-2.0

//! Encoding, traversal, composition, and textual rendering of UEFI
//! device paths.
//!
//! A device path is the binary, self-describing location of a hardware
//! or firmware resource ("this NVMe namespace behind this PCI device"),
//! stored as a packed list of variable-length nodes. This crate is a
//! pure codec over such byte buffers; it talks to no firmware and reads
//! no hardware. Field values (bus numbers, LUNs, partition geometry,
//! GUIDs) come in as plain parameters, and finished buffers go out for
//! whoever stores or prints them.
//!
//! # Reading paths
//!
//! [`DevicePath::try_from_bytes`] validates the framing of a raw buffer
//! and returns a borrowed view. From there, iterate nodes or instances
//! and decode individual nodes with [`DevicePathNode::as_enum`]:
//!
//! ```
//! use efidp::{DevicePath, DevicePathNodeEnum, HardwareNode};
//!
//! # fn main() -> Result<(), efidp::Error> {
//! let bytes = [
//!     0x01, 0x01, 0x06, 0x00, 0x00, 0x1f, // PCI node
//!     0x7f, 0xff, 0x04, 0x00, // END_ENTIRE
//! ];
//! let path = DevicePath::try_from_bytes(&bytes)?;
//! for node in path.node_iter() {
//!     if let DevicePathNodeEnum::Hardware(HardwareNode::Pci { device, .. }) = node.as_enum()? {
//!         assert_eq!(device, 0x1f);
//!     }
//! }
//! # Ok(())
//! # }
//! ```
//!
//! # Creating paths
//!
//! The node structs in [`build`] encode through the two-step size-query
//! idiom ([`build::BuildNode::size_in_bytes`] then
//! [`build::BuildNode::encode_into`]), and
//! [`build::DevicePathBuilder`] assembles whole paths.
//!
//! # Composing paths
//!
//! With the `alloc` feature (on by default), [`append_path`],
//! [`append_node`], and [`append_instance`] combine existing paths into
//! new [`DevicePathBuf`]s.
//!
//! # Printing paths
//!
//! [`DevicePath`] and [`DevicePathNode`] implement [`Display`] with the
//! EDK2-compatible grammar (`PciRoot(0x0)/Pci(0x1f,0x0)/...`); the
//! [`text`] module has the buffer-oriented entry points. Parsing that
//! text back into bytes is intentionally not implemented and reports
//! [`Error::Unsupported`].
//!
//! # Optional crate features
//!
//! - `alloc` (enabled by default): owned paths ([`DevicePathBuf`]) and
//!   the path-composition operations, plus `Vec`-backed building.
//!   Without it the crate works entirely against caller-provided
//!   buffers.
//!
//! [`Display`]: core::fmt::Display

#![cfg_attr(docsrs, feature(doc_auto_cfg))]
#![no_std]
#![warn(clippy::ptr_as_ptr, missing_docs, unused)]
#![deny(clippy::all)]

#[cfg(feature = "alloc")]
extern crate alloc;

#[macro_use]
mod macros;

pub mod arith;

mod result;
pub use self::result::{Error, Result};

mod path;
pub use self::path::{
    is_valid, DevicePath, DevicePathHeader, DevicePathInstance, DevicePathInstanceIterator,
    DevicePathNode, DevicePathNodeIterator, DeviceSubType, DeviceType,
};

pub mod nodes;
pub use self::nodes::{
    AcpiNode, BiosBootNode, BmcInterfaceType, DevicePathNodeEnum, EndNode, HardwareNode,
    InfinibandResourceFlags, Ipv4AddressOrigin, Ipv6AddressOrigin, IscsiLoginOptions,
    IscsiProtocol, MediaNode, MessagingNode, PartitionFormat,
};

pub mod build;
pub mod text;

#[cfg(feature = "alloc")]
mod util;
#[cfg(feature = "alloc")]
pub use self::util::{append_instance, append_node, append_path, DevicePathBuf};

pub use uguid::{guid, Guid};
