// SPDX-License-Identifier: MIT OR Apache-2.0

//! Owned device paths and path composition.
//!
//! Every operation here produces a new [`DevicePathBuf`]; inputs passed
//! by reference are never modified. The one documented exception is
//! [`append_instance`], which rewrites the terminator of the path it is
//! given — it therefore consumes its input by value, so the rewrite is
//! an ownership transfer rather than a side effect on a borrowed buffer.

use crate::path::{DevicePath, DevicePathNode, DeviceSubType};
use crate::{arith, Result};
use alloc::borrow::ToOwned;
use alloc::vec::Vec;
use core::borrow::Borrow;
use core::fmt::{self, Debug, Display, Formatter};
use core::ops::Deref;

/// Bytes of an END_ENTIRE terminator node.
const END_ENTIRE: [u8; 4] = [0x7f, 0xff, 0x04, 0x00];

/// An owned device path, always well-framed and END_ENTIRE-terminated.
///
/// Dereferences to [`DevicePath`], the borrowed view, in the same way
/// `PathBuf` dereferences to `Path`.
#[derive(Clone, Eq, PartialEq)]
pub struct DevicePathBuf {
    data: Vec<u8>,
}

impl DevicePathBuf {
    /// The smallest valid device path: a bare END_ENTIRE terminator.
    #[must_use]
    pub fn end_entire() -> Self {
        Self {
            data: END_ENTIRE.to_vec(),
        }
    }

    /// Validate `bytes` and copy the path they hold.
    ///
    /// Bytes past the END_ENTIRE terminator are not copied.
    pub fn try_from_bytes(bytes: &[u8]) -> Result<Self> {
        Ok(DevicePath::try_from_bytes(bytes)?.to_path_buf())
    }

    /// Consume the path, returning the underlying bytes.
    #[must_use]
    pub fn into_bytes(self) -> Vec<u8> {
        self.data
    }
}

impl Deref for DevicePathBuf {
    type Target = DevicePath;

    fn deref(&self) -> &DevicePath {
        // SAFETY: `data` always holds a path validated at construction.
        unsafe { DevicePath::from_bytes_unchecked(&self.data) }
    }
}

impl AsRef<DevicePath> for DevicePathBuf {
    fn as_ref(&self) -> &DevicePath {
        self
    }
}

impl Borrow<DevicePath> for DevicePathBuf {
    fn borrow(&self) -> &DevicePath {
        self
    }
}

impl Debug for DevicePathBuf {
    fn fmt(&self, f: &mut Formatter) -> fmt::Result {
        Debug::fmt(&**self, f)
    }
}

impl Display for DevicePathBuf {
    fn fmt(&self, f: &mut Formatter) -> fmt::Result {
        Display::fmt(&**self, f)
    }
}

impl DevicePath {
    /// Duplicate the path into an owned buffer, byte for byte.
    #[must_use]
    pub fn to_path_buf(&self) -> DevicePathBuf {
        DevicePathBuf {
            data: self.as_bytes().to_vec(),
        }
    }
}

impl ToOwned for DevicePath {
    type Owned = DevicePathBuf;

    fn to_owned(&self) -> DevicePathBuf {
        self.to_path_buf()
    }
}

/// Create a new path holding `a`'s nodes followed by `b`'s.
///
/// `a`'s END_ENTIRE terminator is dropped; `b` supplies the new path's
/// terminator (and any instance structure of its own). An absent input
/// means the other is simply duplicated, and if both are absent the
/// result is a bare END_ENTIRE path.
pub fn append_path(a: Option<&DevicePath>, b: Option<&DevicePath>) -> Result<DevicePathBuf> {
    match (a, b) {
        (None, None) => Ok(DevicePathBuf::end_entire()),
        (Some(a), None) => Ok(a.to_path_buf()),
        (None, Some(b)) => Ok(b.to_path_buf()),
        (Some(a), Some(b)) => {
            let (body, _) = a.split_terminator();
            let total = arith::add(body.len(), b.size_in_bytes())?;
            let mut data = Vec::with_capacity(total);
            data.extend_from_slice(body);
            data.extend_from_slice(b.as_bytes());
            Ok(DevicePathBuf { data })
        }
    }
}

/// Create a new path holding `path`'s nodes followed by `node` and a
/// fresh END_ENTIRE terminator.
///
/// No instance boundary is introduced. Either input may be absent; with
/// both absent the result is a bare END_ENTIRE path.
pub fn append_node(
    path: Option<&DevicePath>,
    node: Option<&DevicePathNode>,
) -> Result<DevicePathBuf> {
    let body = path.map_or(&[][..], |path| path.split_terminator().0);
    let node_bytes = node.map_or(&[][..], DevicePathNode::as_bytes);

    let total = arith::add(
        arith::add(body.len(), node_bytes.len())?,
        END_ENTIRE.len(),
    )?;
    let mut data = Vec::with_capacity(total);
    data.extend_from_slice(body);
    data.extend_from_slice(node_bytes);
    data.extend_from_slice(&END_ENTIRE);
    Ok(DevicePathBuf { data })
}

/// Append `instance` to `path` as a new path instance.
///
/// `path`'s END_ENTIRE terminator is rewritten in place to END_INSTANCE
/// before `instance` (a complete path supplying the new terminator) is
/// copied after it; consuming `path` makes that rewrite safe.
pub fn append_instance(path: DevicePathBuf, instance: &DevicePath) -> Result<DevicePathBuf> {
    let terminator_offset = path.split_terminator().0.len();
    arith::add(path.size_in_bytes(), instance.size_in_bytes())?;

    let mut data = path.into_bytes();
    data[terminator_offset + 1] = DeviceSubType::END_INSTANCE.0;
    data.extend_from_slice(instance.as_bytes());
    Ok(DevicePathBuf { data })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::build::{self, BuildNode, DevicePathBuilder};
    use crate::path::DeviceType;

    fn sample_path(nodes: &[&dyn BuildNode]) -> DevicePathBuf {
        let mut v = Vec::new();
        let mut builder = DevicePathBuilder::with_vec(&mut v);
        for node in nodes {
            builder = builder.push(*node).unwrap();
        }
        builder.finalize().unwrap().to_path_buf()
    }

    fn acpi_pci() -> DevicePathBuf {
        sample_path(&[
            &build::acpi::Acpi {
                hid: 0x0a03_41d0,
                uid: 0,
            },
            &build::hardware::Pci {
                function: 0,
                device: 0x1f,
            },
        ])
    }

    #[test]
    fn test_duplicate() {
        let path = acpi_pci();
        let copy = path.to_path_buf();
        assert_eq!(path.as_bytes(), copy.as_bytes());
        assert_eq!(path.size_in_bytes(), copy.size_in_bytes());
    }

    #[test]
    fn test_append_path() {
        let a = acpi_pci();
        let b = sample_path(&[&build::messaging::Sata {
            hba_port_number: 0,
            port_multiplier_port_number: 0xffff,
            logical_unit_number: 0,
        }]);

        let joined = append_path(Some(&a), Some(&b)).unwrap();
        // One END_ENTIRE node's worth of bytes is dropped from `a`.
        assert_eq!(
            joined.size_in_bytes(),
            a.size_in_bytes() - 4 + b.size_in_bytes()
        );

        let nodes: Vec<_> = joined.node_iter().collect();
        assert_eq!(nodes.len(), 3);
        assert_eq!(nodes[0].device_type(), DeviceType::ACPI);
        assert_eq!(nodes[1].device_type(), DeviceType::HARDWARE);
        assert_eq!(nodes[2].device_type(), DeviceType::MESSAGING);
    }

    #[test]
    fn test_append_path_absent_inputs() {
        let a = acpi_pci();
        assert_eq!(
            append_path(Some(&a), None).unwrap().as_bytes(),
            a.as_bytes()
        );
        assert_eq!(
            append_path(None, Some(&a)).unwrap().as_bytes(),
            a.as_bytes()
        );
        assert_eq!(
            append_path(None, None).unwrap().as_bytes(),
            [0x7f, 0xff, 0x04, 0x00]
        );
    }

    #[test]
    fn test_append_node() {
        let path = acpi_pci();
        let node_path = sample_path(&[&build::messaging::NvmeNamespace {
            namespace_identifier: 1,
            ieee_extended_unique_identifier: None,
        }]);
        let node = node_path.node_iter().next().unwrap();

        let joined = append_node(Some(&path), Some(node)).unwrap();

        // Original nodes, then the appended node, then a single
        // END_ENTIRE with no instance boundary introduced.
        let nodes: Vec<_> = joined.node_iter().collect();
        assert_eq!(nodes.len(), 3);
        assert_eq!(nodes[2].device_type(), DeviceType::MESSAGING);
        assert!(!joined.is_multi_instance());
        assert!(joined.as_bytes().ends_with(&[0x7f, 0xff, 0x04, 0x00]));
    }

    #[test]
    fn test_append_node_absent_inputs() {
        assert_eq!(
            append_node(None, None).unwrap().as_bytes(),
            [0x7f, 0xff, 0x04, 0x00]
        );
    }

    #[test]
    fn test_append_instance() {
        let a = acpi_pci();
        let b = sample_path(&[&build::messaging::Sd { slot_number: 1 }]);
        let a_size = a.size_in_bytes();

        let joined = append_instance(a, &b).unwrap();
        assert!(joined.is_multi_instance());
        assert_eq!(joined.instance_iter().count(), 2);
        assert_eq!(joined.size_in_bytes(), a_size + b.size_in_bytes());

        // The first instance's terminator was rewritten in place.
        let first = joined.instance_iter().next().unwrap();
        assert_eq!(first.size_in_bytes(), a_size);
        assert_eq!(joined.as_bytes()[a_size - 4..a_size], [0x7f, 0x01, 0x04, 0x00]);

        // Appending another instance to an already multi-instance path.
        let c = sample_path(&[&build::messaging::Emmc { slot_number: 0 }]);
        let joined = append_instance(joined, &c).unwrap();
        assert_eq!(joined.instance_iter().count(), 3);
        assert!(joined.is_multi_instance());
    }

    #[test]
    fn test_display_matches_path_display() {
        use alloc::string::ToString;
        let path = acpi_pci();
        assert_eq!(path.to_string(), "PciRoot(0x0)/Pci(0x1f,0x0)");
    }
}
