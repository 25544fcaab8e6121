/// Property rows that can be selected and ordered in configuration.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum RowKind {
    Name,
    Directory,
    FullPath,
    RealPath,
    Size,
    Created,
    Changed,
    Modified,
    Accessed,
    Owner,
    Permissions,
    MediaType,
}

impl RowKind {
    /// Default selection, in default order.
    pub const ALL: [RowKind; 12] = [
        RowKind::Name,
        RowKind::Directory,
        RowKind::FullPath,
        RowKind::RealPath,
        RowKind::Size,
        RowKind::Created,
        RowKind::Changed,
        RowKind::Modified,
        RowKind::Accessed,
        RowKind::Owner,
        RowKind::Permissions,
        RowKind::MediaType,
    ];

    /// Parse a configuration descriptor. Both `fullPath` and `full-path`
    /// spellings are accepted.
    pub fn from_descriptor(descriptor: &str) -> Option<Self> {
        let kind = match descriptor {
            "name" => RowKind::Name,
            "directory" => RowKind::Directory,
            "fullPath" | "full-path" => RowKind::FullPath,
            "realPath" | "real-path" => RowKind::RealPath,
            "size" => RowKind::Size,
            "created" => RowKind::Created,
            "changed" => RowKind::Changed,
            "modified" => RowKind::Modified,
            "accessed" => RowKind::Accessed,
            "owner" => RowKind::Owner,
            "permissions" => RowKind::Permissions,
            "mediaType" | "media-type" => RowKind::MediaType,
            _ => return None,
        };
        Some(kind)
    }

    /// Canonical descriptor, also used as the `data-type` attribute and the
    /// `rowKind` of row updates.
    pub fn descriptor(self) -> &'static str {
        match self {
            RowKind::Name => "name",
            RowKind::Directory => "directory",
            RowKind::FullPath => "fullPath",
            RowKind::RealPath => "realPath",
            RowKind::Size => "size",
            RowKind::Created => "created",
            RowKind::Changed => "changed",
            RowKind::Modified => "modified",
            RowKind::Accessed => "accessed",
            RowKind::Owner => "owner",
            RowKind::Permissions => "permissions",
            RowKind::MediaType => "mediaType",
        }
    }

    pub fn label(self) -> &'static str {
        match self {
            RowKind::Name => "Name",
            RowKind::Directory => "Directory",
            RowKind::FullPath => "Full Path",
            RowKind::RealPath => "Real Path",
            RowKind::Size => "Size",
            RowKind::Created => "Created",
            RowKind::Changed => "Changed",
            RowKind::Modified => "Modified",
            RowKind::Accessed => "Accessed",
            RowKind::Owner => "Owner",
            RowKind::Permissions => "Permissions",
            RowKind::MediaType => "Media Type",
        }
    }
}

#[cfg(test)]
#[path = "kind_tests.rs"]
mod tests;
