use deploy_core::{ArtifactSpec, ConstructorArg};

pub const TAG: &str = "Mocks";

const MOCKS: [&str; 3] = ["ERC20Mock", "ERC721Mock", "ERC1155Mock"];

/// Tokens de prueba: `(name, symbol) = (<Name>, <Name>)`, salt con el nombre.
pub fn specs() -> Vec<ArtifactSpec> {
    MOCKS.iter()
         .map(|name| {
             ArtifactSpec::new(*name).args([ConstructorArg::value(*name), ConstructorArg::value(*name)])
                                     .salt_seed(*name)
                                     .tag(TAG)
         })
         .collect()
}
