use std::fmt;
use std::marker::PhantomData;

/// String identifier tagged with the kind of thing it names, so a server id cannot be passed
/// where a cloud name is expected.
#[derive(PartialEq, Eq, PartialOrd, Ord, Clone, Hash)]
pub struct Id<T> {
    value: String,
    _kind: PhantomData<T>,
}

impl<T> Id<T> {
    pub fn new(value: impl Into<String>) -> Self {
        Id { value: value.into(), _kind: PhantomData }
    }

    pub fn as_str(&self) -> &str {
        &self.value
    }
}

impl<T> fmt::Display for Id<T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.value)
    }
}

impl<T> fmt::Debug for Id<T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let tag = std::any::type_name::<T>().rsplit("::").next().unwrap_or_default();
        write!(f, "{}: {:?}", tag.replace("Tag", "Id"), self.value)
    }
}

#[derive(Debug, PartialEq, Eq, PartialOrd, Ord, Clone, Hash, Copy)]
pub struct CloudTag;
#[derive(Debug, PartialEq, Eq, PartialOrd, Ord, Clone, Hash, Copy)]
pub struct ServerTag;
#[derive(Debug, PartialEq, Eq, PartialOrd, Ord, Clone, Hash, Copy)]
pub struct TemplateTag;
#[derive(Debug, PartialEq, Eq, PartialOrd, Ord, Clone, Hash, Copy)]
pub struct ProvisioningActivityTag;
#[derive(Debug, PartialEq, Eq, PartialOrd, Ord, Clone, Hash, Copy)]
pub struct NodeTag;

pub type CloudName = Id<CloudTag>;
pub type ServerId = Id<ServerTag>;
pub type TemplateName = Id<TemplateTag>;
pub type ProvisioningActivityId = Id<ProvisioningActivityTag>;
pub type NodeName = Id<NodeTag>;

impl ProvisioningActivityId {
    /// Fresh identifier for an activity that is about to be recorded.
    pub fn generate() -> Self {
        Id::new(uuid::Uuid::new_v4().to_string())
    }
}
