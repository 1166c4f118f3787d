//! CLI tool for deploying and operating the yield vault contracts.

use yield_vault_contracts::oracle::PriceOracle;
use yield_vault_contracts::protocol::YieldPool;
use yield_vault_contracts::rewards::RewardDistributor;
use yield_vault_contracts::strategy::LendingStrategy;
use yield_vault_contracts::tokens::AssetToken;
use yield_vault_contracts::vault::YieldVault;
use odra::casper_types::U256;
use odra::prelude::{Address, Addressable};
use odra::host::HostEnv;
use odra::schema::casper_contract_schema::NamedCLType;
use odra_cli::{
    deploy::DeployScript,
    scenario::{Args, Error, Scenario, ScenarioMetadata},
    CommandArg, ContractProvider, DeployedContractsContainer, DeployerExt,
    OdraCli,
};

/// One week, in block-time milliseconds
const REWARD_DURATION: u64 = 604_800_000;

/// Deploys the base asset, the price oracle and the yield pool.
pub struct MarketDeployScript;

impl DeployScript for MarketDeployScript {
    fn deploy(
        &self,
        env: &HostEnv,
        container: &mut DeployedContractsContainer
    ) -> Result<(), odra_cli::deploy::Error> {
        use yield_vault_contracts::oracle::PriceOracleInitArgs;
        use yield_vault_contracts::protocol::yield_pool::YieldPoolInitArgs;
        use yield_vault_contracts::tokens::AssetTokenInitArgs;

        let asset = AssetToken::load_or_deploy(
            &env,
            AssetTokenInitArgs {
                name: String::from("Vault Asset"),
                symbol: String::from("VAST"),
            },
            container,
            300_000_000_000
        )?;

        let _oracle = PriceOracle::load_or_deploy(
            &env,
            PriceOracleInitArgs {
                initial_value: U256::exp10(18),
            },
            container,
            200_000_000_000
        )?;

        let _pool = YieldPool::load_or_deploy(
            &env,
            YieldPoolInitArgs {
                asset_address: asset.address().clone(),
            },
            container,
            400_000_000_000
        )?;

        Ok(())
    }
}

/// Deploys the lending strategy and the vault, then binds them.
/// Requires the market to be deployed first.
pub struct VaultDeployScript;

impl DeployScript for VaultDeployScript {
    fn deploy(
        &self,
        env: &HostEnv,
        container: &mut DeployedContractsContainer
    ) -> Result<(), odra_cli::deploy::Error> {
        use yield_vault_contracts::strategy::lending_strategy::LendingStrategyInitArgs;
        use yield_vault_contracts::vault::yield_vault::YieldVaultInitArgs;

        let asset = container.contract_ref::<AssetToken>(env)?;
        let oracle = container.contract_ref::<PriceOracle>(env)?;
        let pool = container.contract_ref::<YieldPool>(env)?;
        let asset_address = asset.address().clone();

        let mut strategy = LendingStrategy::load_or_deploy(
            &env,
            LendingStrategyInitArgs {
                asset_address,
                protocol_address: pool.address().clone(),
                oracle_address: oracle.address().clone(),
            },
            container,
            400_000_000_000
        )?;

        let vault = YieldVault::load_or_deploy(
            &env,
            YieldVaultInitArgs {
                asset_address,
                strategy_address: strategy.address().clone(),
                name: String::from("Yield Vault Share"),
                symbol: String::from("yvSHARE"),
            },
            container,
            500_000_000_000
        )?;

        if strategy.vault().is_none() {
            env.set_gas(50_000_000_000);
            strategy.try_set_vault(vault.address().clone())?;
        }

        Ok(())
    }
}

/// Deploys the reward distributor and registers it with the vault.
pub struct RewardsDeployScript;

impl DeployScript for RewardsDeployScript {
    fn deploy(
        &self,
        env: &HostEnv,
        container: &mut DeployedContractsContainer
    ) -> Result<(), odra_cli::deploy::Error> {
        use yield_vault_contracts::rewards::reward_distributor::RewardDistributorInitArgs;

        let asset = container.contract_ref::<AssetToken>(env)?;
        let mut vault = container.contract_ref::<YieldVault>(env)?;

        let distributor = RewardDistributor::load_or_deploy(
            &env,
            RewardDistributorInitArgs {
                reward_token: asset.address().clone(),
                notifier: vault.address().clone(),
                duration: REWARD_DURATION,
            },
            container,
            300_000_000_000
        )?;

        env.set_gas(50_000_000_000);
        vault.try_set_reward_distributor(distributor.address().clone())?;

        Ok(())
    }
}

/// Deploys the complete system.
pub struct FullDeployScript;

impl DeployScript for FullDeployScript {
    fn deploy(
        &self,
        env: &HostEnv,
        container: &mut DeployedContractsContainer
    ) -> Result<(), odra_cli::deploy::Error> {
        MarketDeployScript.deploy(env, container)?;
        VaultDeployScript.deploy(env, container)?;
        RewardsDeployScript.deploy(env, container)?;
        Ok(())
    }
}

/// Moves on-hand assets above the reserve target into the strategy.
pub struct InvestScenario;

impl Scenario for InvestScenario {
    fn run(
        &self,
        env: &HostEnv,
        container: &DeployedContractsContainer,
        _args: Args
    ) -> Result<(), Error> {
        let mut vault = container.contract_ref::<YieldVault>(env)?;
        env.set_gas(300_000_000_000);
        let amount = vault.try_invest()?;
        println!("Invested {} into the strategy", amount);
        Ok(())
    }
}

impl ScenarioMetadata for InvestScenario {
    const NAME: &'static str = "invest";
    const DESCRIPTION: &'static str = "Deploys surplus on-hand assets into the active strategy";
}

/// Tops the on-hand reserve back up from the strategy.
pub struct RebalanceScenario;

impl Scenario for RebalanceScenario {
    fn run(
        &self,
        env: &HostEnv,
        container: &DeployedContractsContainer,
        _args: Args
    ) -> Result<(), Error> {
        let mut vault = container.contract_ref::<YieldVault>(env)?;
        env.set_gas(300_000_000_000);
        let received = vault.try_rebalance()?;
        println!("Pulled {} back from the strategy", received);
        Ok(())
    }
}

impl ScenarioMetadata for RebalanceScenario {
    const NAME: &'static str = "rebalance";
    const DESCRIPTION: &'static str = "Restores the on-hand reserve target";
}

/// Runs the price gate and the profit skim.
pub struct HarvestScenario;

impl Scenario for HarvestScenario {
    fn run(
        &self,
        env: &HostEnv,
        container: &DeployedContractsContainer,
        _args: Args
    ) -> Result<(), Error> {
        let mut vault = container.contract_ref::<YieldVault>(env)?;
        env.set_gas(200_000_000_000);
        let price = vault.try_harvest()?;
        println!("Current price: {}", price);
        println!("Rewards accrued: {}", vault.total_reward_accrued());
        Ok(())
    }
}

impl ScenarioMetadata for HarvestScenario {
    const NAME: &'static str = "harvest";
    const DESCRIPTION: &'static str = "Validates strategy prices and skims profit";
}

/// Forwards accrued rewards to the distributor.
pub struct DistributeRewardsScenario;

impl Scenario for DistributeRewardsScenario {
    fn run(
        &self,
        env: &HostEnv,
        container: &DeployedContractsContainer,
        _args: Args
    ) -> Result<(), Error> {
        let mut vault = container.contract_ref::<YieldVault>(env)?;
        env.set_gas(200_000_000_000);
        let amount = vault.try_distribute_rewards()?;
        println!("Distributed {} in rewards", amount);
        Ok(())
    }
}

impl ScenarioMetadata for DistributeRewardsScenario {
    const NAME: &'static str = "distribute-rewards";
    const DESCRIPTION: &'static str = "Sends accrued rewards to the reward distributor";
}

/// Publishes a new oracle price.
pub struct SetOracleValueScenario;

impl Scenario for SetOracleValueScenario {
    fn args(&self) -> Vec<CommandArg> {
        vec![
            CommandArg::new(
                "value",
                "New price, assets per unit scaled by 1e18",
                NamedCLType::U256,
            ),
        ]
    }

    fn run(
        &self,
        env: &HostEnv,
        container: &DeployedContractsContainer,
        args: Args
    ) -> Result<(), Error> {
        let mut oracle = container.contract_ref::<PriceOracle>(env)?;
        let value = args.get_single::<U256>("value")?;

        env.set_gas(50_000_000_000);
        oracle.try_set_value(value)?;

        println!("Oracle price set to {}", value);
        Ok(())
    }
}

impl ScenarioMetadata for SetOracleValueScenario {
    const NAME: &'static str = "set-oracle-value";
    const DESCRIPTION: &'static str = "Publishes a new reference price";
}

/// Switches the vault to a strategy already bound to it.
pub struct ChangeStrategyScenario;

impl Scenario for ChangeStrategyScenario {
    fn args(&self) -> Vec<CommandArg> {
        vec![
            CommandArg::new(
                "strategy",
                "Address of the new strategy (already bound to the vault)",
                NamedCLType::Key,
            ),
        ]
    }

    fn run(
        &self,
        env: &HostEnv,
        container: &DeployedContractsContainer,
        args: Args
    ) -> Result<(), Error> {
        let mut vault = container.contract_ref::<YieldVault>(env)?;
        let strategy = args.get_single::<Address>("strategy")?;

        env.set_gas(500_000_000_000);
        let drained = vault.try_change_strategy(strategy)?;

        println!("Strategy changed, {} recovered from the old one", drained);
        Ok(())
    }
}

impl ScenarioMetadata for ChangeStrategyScenario {
    const NAME: &'static str = "change-strategy";
    const DESCRIPTION: &'static str = "Drains the active strategy and switches to a new one";
}

/// Main function to run the CLI tool.
pub fn main() {
    OdraCli::new()
        .about("CLI tool for the yield vault contracts")
        // Deploy scripts
        .deploy(MarketDeployScript)
        .deploy(VaultDeployScript)
        .deploy(RewardsDeployScript)
        .deploy(FullDeployScript)
        // Contract references
        .contract::<AssetToken>()
        .contract::<PriceOracle>()
        .contract::<YieldPool>()
        .contract::<LendingStrategy>()
        .contract::<YieldVault>()
        .contract::<RewardDistributor>()
        // Scenarios
        .scenario(InvestScenario)
        .scenario(RebalanceScenario)
        .scenario(HarvestScenario)
        .scenario(DistributeRewardsScenario)
        .scenario(SetOracleValueScenario)
        .scenario(ChangeStrategyScenario)
        .build()
        .run();
}
