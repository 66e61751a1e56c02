use crate::config::LoaderConfig;

#[derive(Clone, Debug, PartialEq)]
pub enum Effect {
    LoadCatalog { loader: LoaderConfig },
}
