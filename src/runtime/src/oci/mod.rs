//! OCI image layout support.
//!
//! Lets a buildpackage saved as an OCI image layout act as a [`Package`]:
//!
//! ```text
//! ┌─────────────────────────────────────────────────────────────┐
//! │                    OCI Image Layout                          │
//! │                                                              │
//! │  package/                                                    │
//! │  ├── oci-layout           (OCI layout marker)               │
//! │  ├── index.json           (Image index)                     │
//! │  └── blobs/                                                 │
//! │      └── sha256/                                            │
//! │          ├── <manifest>   (Image manifest)                  │
//! │          ├── <config>     (Labels, rootfs diff IDs)         │
//! │          └── <layers>     (One layer per build module)      │
//! └─────────────────────────────────────────────────────────────┘
//! ```
//!
//! [`Package`]: crate::package::Package

mod digest;
mod layout;
#[cfg(test)]
pub(crate) mod testing;

pub use digest::{sha256_digest, DigestReader};
pub use layout::OciLayoutPackage;
