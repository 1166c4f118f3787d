//! Scenario tests for the yield vault

#[cfg(test)]
mod tests {
    use odra::host::{Deployer, HostEnv};
    use odra::prelude::*;
    use odra::casper_types::U256;
    use crate::math::{BOOTSTRAP_SHARES, SCALE};
    use crate::oracle::{PriceOracle, PriceOracleHostRef, PriceOracleInitArgs};
    use crate::protocol::ProtocolError;
    use crate::protocol::yield_pool::{YieldPool, YieldPoolHostRef, YieldPoolInitArgs};
    use crate::rewards::reward_distributor::{RewardDistributor, RewardDistributorInitArgs};
    use crate::strategy::{HoldStrategy, LendingStrategy, StrategyError};
    use crate::strategy::hold_strategy::HoldStrategyInitArgs;
    use crate::strategy::lending_strategy::{LendingStrategyHostRef, LendingStrategyInitArgs};
    use crate::testing::{MockStrategy, MockStrategyHostRef, MockStrategyInitArgs};
    use crate::tokens::{AssetToken, AssetTokenHostRef, AssetTokenInitArgs};
    use crate::vault::VaultError;
    use crate::vault::yield_vault::{YieldVault, YieldVaultHostRef, YieldVaultInitArgs};

    const DAY: u64 = 86_400_000;

    struct Fixture {
        env: HostEnv,
        asset: AssetTokenHostRef,
        pool: YieldPoolHostRef,
        oracle: PriceOracleHostRef,
        strategy: LendingStrategyHostRef,
        vault: YieldVaultHostRef,
    }

    fn units(n: u64) -> U256 {
        U256::from(n) * U256::from(SCALE)
    }

    fn deploy_asset(env: &HostEnv, symbol: &str) -> AssetTokenHostRef {
        AssetToken::deploy(
            env,
            AssetTokenInitArgs {
                name: String::from("Vault Asset"),
                symbol: String::from(symbol),
            },
        )
    }

    fn deploy_vault(env: &HostEnv, asset: &AssetTokenHostRef, strategy: Address) -> YieldVaultHostRef {
        YieldVault::deploy(
            env,
            YieldVaultInitArgs {
                asset_address: asset.address().clone(),
                strategy_address: strategy,
                name: String::from("Yield Vault Share"),
                symbol: String::from("yvSHARE"),
            },
        )
    }

    /// Asset, pool, oracle, lending strategy and vault; accounts 0..=3 funded
    fn setup() -> Fixture {
        let env = odra_test::env();
        let mut asset = deploy_asset(&env, "VAST");
        let pool = YieldPool::deploy(&env, YieldPoolInitArgs { asset_address: asset.address().clone() });
        let oracle = PriceOracle::deploy(&env, PriceOracleInitArgs { initial_value: U256::from(SCALE) });
        let mut strategy = LendingStrategy::deploy(
            &env,
            LendingStrategyInitArgs {
                asset_address: asset.address().clone(),
                protocol_address: pool.address().clone(),
                oracle_address: oracle.address().clone(),
            },
        );
        let vault = deploy_vault(&env, &asset, strategy.address().clone());
        strategy.set_vault(vault.address().clone());

        for i in 0..4 {
            asset.mint(env.get_account(i), units(10_000));
        }

        Fixture { env, asset, pool, oracle, strategy, vault }
    }

    /// Vault wired to a `MockStrategy` instead of the lending strategy
    fn setup_mock() -> (HostEnv, AssetTokenHostRef, MockStrategyHostRef, YieldVaultHostRef) {
        let env = odra_test::env();
        let mut asset = deploy_asset(&env, "VAST");
        let mut mock = MockStrategy::deploy(&env, MockStrategyInitArgs { asset_address: asset.address().clone() });
        let vault = deploy_vault(&env, &asset, mock.address().clone());
        mock.set_vault(vault.address().clone());
        for i in 0..4 {
            asset.mint(env.get_account(i), units(10_000));
        }
        (env, asset, mock, vault)
    }

    fn deposit_as(
        env: &HostEnv,
        asset: &mut AssetTokenHostRef,
        vault: &mut YieldVaultHostRef,
        user: Address,
        amount: U256,
    ) -> U256 {
        env.set_caller(user);
        asset.approve(vault.address().clone(), amount);
        let shares = vault.deposit(amount);
        env.set_caller(env.get_account(0));
        shares
    }

    fn deposit(f: &mut Fixture, user: Address, amount: U256) -> U256 {
        deposit_as(&f.env, &mut f.asset, &mut f.vault, user, amount)
    }

    fn withdraw(f: &mut Fixture, user: Address, shares: U256) -> U256 {
        f.env.set_caller(user);
        let amount = f.vault.withdraw(shares);
        f.env.set_caller(f.env.get_account(0));
        amount
    }

    /// Book 4% yield on a 900 unit position and move the oracle with it
    fn accrue_four_percent(f: &mut Fixture) {
        f.asset.approve(f.pool.address().clone(), units(36));
        f.pool.accrue_yield(units(36));
        f.oracle.set_value(units(104) / U256::from(100));
    }

    #[test]
    fn test_deposit_withdraw_scenario() {
        let mut f = setup();
        let user = f.env.get_account(1);

        assert_eq!(deposit(&mut f, user, units(1000)), units(100));
        assert_eq!(f.vault.current_price(), units(10));

        assert_eq!(withdraw(&mut f, user, units(50)), units(500));
        assert_eq!(f.vault.balance_of(user), units(50));

        f.env.set_caller(user);
        assert_eq!(f.vault.try_withdraw(units(60)), Err(VaultError::InsufficientBalance.into()));
        assert_eq!(f.vault.balance_of(user), units(50));
        assert_eq!(f.vault.total_supply(), units(50));
        assert_eq!(f.vault.total_value(), units(500));
    }

    #[test]
    fn test_first_deposit_always_mints_bootstrap_shares() {
        let mut f = setup();
        let user = f.env.get_account(1);

        assert_eq!(f.vault.convert_to_shares(units(3)), U256::from(BOOTSTRAP_SHARES));
        assert_eq!(deposit(&mut f, user, units(3)), U256::from(BOOTSTRAP_SHARES));
        assert_eq!(f.vault.current_price(), U256::from(SCALE) * U256::from(3) / U256::from(100));
    }

    #[test]
    fn test_dust_first_deposit_rejected() {
        let mut f = setup();
        let user = f.env.get_account(1);

        f.env.set_caller(user);
        f.asset.approve(f.vault.address().clone(), U256::from(50u64));
        assert_eq!(f.vault.try_deposit(U256::from(50u64)), Err(VaultError::ZeroPrice.into()));
        assert_eq!(f.vault.total_supply(), U256::zero());
        assert_eq!(f.vault.current_price(), U256::zero());

        // 100 base units is the smallest bootstrap with a non-zero price
        assert_eq!(deposit(&mut f, user, U256::from(100u64)), U256::from(BOOTSTRAP_SHARES));
        assert_eq!(f.vault.current_price(), U256::one());
    }

    #[test]
    fn test_collapsed_price_halts_instead_of_zeroing() {
        let (env, mut asset, mut mock, mut vault) = setup_mock();
        let user = env.get_account(1);
        deposit_as(&env, &mut asset, &mut vault, user, U256::from(100u64));
        assert_eq!(vault.invest(), U256::from(90u64));

        // 10 base units left behind 100e18 shares round the price down to 0
        mock.lose(U256::from(90u64), env.get_account(5));
        assert_eq!(vault.try_harvest(), Err(VaultError::ZeroTotalValue.into()));
        assert_eq!(vault.current_price(), U256::one());
    }

    #[test]
    fn test_zero_amounts_rejected() {
        let mut f = setup();
        f.env.set_caller(f.env.get_account(1));
        assert_eq!(f.vault.try_deposit(U256::zero()), Err(VaultError::ZeroAmount.into()));
        assert_eq!(f.vault.try_withdraw(U256::zero()), Err(VaultError::ZeroAmount.into()));
    }

    #[test]
    fn test_share_conservation_across_users() {
        let mut f = setup();
        let users = [f.env.get_account(1), f.env.get_account(2), f.env.get_account(3)];

        assert_eq!(deposit(&mut f, users[0], units(1000)), units(100));
        assert_eq!(deposit(&mut f, users[1], units(500)), units(50));
        assert_eq!(deposit(&mut f, users[2], units(250)), units(25));
        f.vault.invest();

        withdraw(&mut f, users[1], units(20));
        withdraw(&mut f, users[0], units(75));

        let sum = users
            .iter()
            .fold(U256::zero(), |acc, user| acc + f.vault.balance_of(*user));
        assert_eq!(sum, f.vault.total_supply());
        assert_eq!(f.vault.total_supply(), units(80));
    }

    #[test]
    fn test_round_trip_never_returns_more() {
        let mut f = setup();
        let whale = f.env.get_account(1);
        let user = f.env.get_account(2);
        deposit(&mut f, whale, units(1000));

        let amount = U256::from(333_333u64);
        let shares = deposit(&mut f, user, amount);
        assert_eq!(shares, U256::from(33_333u64));
        assert!(withdraw(&mut f, user, shares) <= amount);
    }

    #[test]
    fn test_invest_and_rebalance() {
        let mut f = setup();
        let user = f.env.get_account(1);
        deposit(&mut f, user, units(1000));

        assert_eq!(f.vault.invest(), units(900));
        assert_eq!(f.strategy.total_value(), units(900));
        assert_eq!(f.vault.on_hand_reserve(), units(100));
        assert_eq!(f.vault.invest(), U256::zero());
        assert_eq!(f.vault.rebalance(), U256::zero());

        // 400 of the payout comes from the strategy, plus the 1 unit nudge
        assert_eq!(withdraw(&mut f, user, units(50)), units(500));
        assert_eq!(f.vault.on_hand_reserve(), U256::one());

        assert_eq!(f.vault.rebalance(), units(50));
        assert_eq!(f.vault.on_hand_reserve(), units(50) + U256::one());
        assert_eq!(f.vault.total_value(), units(500));
    }

    #[test]
    fn test_profit_skim_on_harvest() {
        let mut f = setup();
        let user = f.env.get_account(1);
        deposit(&mut f, user, units(1000));
        f.vault.invest();
        accrue_four_percent(&mut f);

        // price 10 -> 10.36, 1% of the increase per share is skimmed
        assert_eq!(f.vault.harvest(), U256::from(10_356_400_000_000_000_000u128));
        assert_eq!(f.vault.total_reward_accrued(), U256::from(360_000_000_000_000_000u128));
        assert_eq!(f.vault.on_hand_reserve(), units(100));
        assert_eq!(f.strategy.virtual_price(), units(104) / U256::from(100));

        // no further appreciation, nothing more to skim
        f.vault.harvest();
        assert_eq!(f.vault.total_reward_accrued(), U256::from(360_000_000_000_000_000u128));
    }

    #[test]
    fn test_skim_earmarked_from_reserve() {
        let (env, mut asset, _mock, mut vault) = setup_mock();
        let user = env.get_account(1);
        deposit_as(&env, &mut asset, &mut vault, user, units(1000));

        // a donation lifts the price without touching the empty strategy
        env.set_caller(env.get_account(2));
        asset.transfer(vault.address().clone(), units(100));
        env.set_caller(env.get_account(0));

        assert_eq!(vault.harvest(), U256::from(10_990_000_000_000_000_000u128));
        assert_eq!(vault.total_reward_accrued(), units(1));
        assert_eq!(vault.on_hand_reserve(), units(1099));
    }

    #[test]
    fn test_frozen_protocol_withdraw_is_atomic() {
        let mut f = setup();
        let user = f.env.get_account(1);
        deposit(&mut f, user, units(1000));
        f.vault.invest();
        f.pool.set_withdrawals_frozen(true);

        f.env.set_caller(user);
        assert_eq!(
            f.vault.try_withdraw(units(50)),
            Err(ProtocolError::WithdrawalsFrozen.into())
        );
        assert_eq!(f.vault.balance_of(user), units(100));
        assert_eq!(f.vault.on_hand_reserve(), units(100));

        // the reserve still covers small exits
        assert_eq!(f.vault.withdraw(units(5)), units(50));
    }

    #[test]
    fn test_oracle_divergence_halts_deposits() {
        let mut f = setup();
        let user = f.env.get_account(1);
        deposit(&mut f, user, units(1000));

        f.oracle.set_value(units(106) / U256::from(100));
        f.env.set_caller(user);
        f.asset.approve(f.vault.address().clone(), units(10));
        assert_eq!(f.vault.try_deposit(units(10)), Err(StrategyError::PriceDivergence.into()));
        assert_eq!(f.vault.try_withdraw(units(10)), Err(StrategyError::PriceDivergence.into()));
    }

    #[test]
    fn test_vault_gate_rejects_divergent_strategy() {
        let (env, mut asset, mut mock, mut vault) = setup_mock();
        mock.set_prices(units(1), units(2), U256::zero());

        let user = env.get_account(1);
        env.set_caller(user);
        asset.approve(vault.address().clone(), units(10));
        assert_eq!(vault.try_deposit(units(10)), Err(VaultError::PriceDivergence.into()));
    }

    #[test]
    fn test_reentrant_strategy_is_locked() {
        let (env, mut asset, mut mock, mut vault) = setup_mock();
        let user = env.get_account(1);
        deposit_as(&env, &mut asset, &mut vault, user, units(1000));
        assert_eq!(vault.invest(), units(900));

        mock.set_reenter(true);
        env.set_caller(user);
        assert_eq!(vault.try_withdraw(units(50)), Err(VaultError::Locked.into()));
        assert_eq!(vault.balance_of(user), units(100));
    }

    #[test]
    fn test_change_strategy_drains_old() {
        let mut f = setup();
        let user = f.env.get_account(1);
        deposit(&mut f, user, units(1000));
        f.vault.invest();

        let mut hold = HoldStrategy::deploy(
            &f.env,
            HoldStrategyInitArgs { asset_address: f.asset.address().clone() },
        );
        hold.set_vault(f.vault.address().clone());

        assert_eq!(f.vault.change_strategy(hold.address().clone()), units(900));
        assert_eq!(f.vault.strategy(), hold.address().clone());
        assert_eq!(f.strategy.total_value(), U256::zero());
        assert_eq!(f.vault.on_hand_reserve(), units(1000));
        assert_eq!(
            f.vault.try_change_strategy(hold.address().clone()),
            Err(VaultError::SameStrategy.into())
        );

        assert_eq!(f.vault.invest(), units(900));
        assert_eq!(hold.total_value(), units(900));
        assert_eq!(withdraw(&mut f, user, units(100)), units(1000));
        assert_eq!(f.vault.current_price(), U256::zero());
    }

    #[test]
    fn test_change_strategy_blocked_when_drain_fails() {
        let mut f = setup();
        let user = f.env.get_account(1);
        deposit(&mut f, user, units(1000));
        f.vault.invest();
        f.pool.set_withdrawals_frozen(true);

        let mut hold = HoldStrategy::deploy(
            &f.env,
            HoldStrategyInitArgs { asset_address: f.asset.address().clone() },
        );
        hold.set_vault(f.vault.address().clone());

        assert_eq!(
            f.vault.try_change_strategy(hold.address().clone()),
            Err(ProtocolError::WithdrawalsFrozen.into())
        );
        assert_eq!(f.vault.strategy(), f.strategy.address().clone());
        assert_eq!(f.strategy.total_value(), units(900));
    }

    #[test]
    fn test_change_strategy_rejects_foreign_asset() {
        let mut f = setup();
        let other = deploy_asset(&f.env, "OTHR");
        let hold = HoldStrategy::deploy(
            &f.env,
            HoldStrategyInitArgs { asset_address: other.address().clone() },
        );
        assert_eq!(
            f.vault.try_change_strategy(hold.address().clone()),
            Err(VaultError::InvalidStrategy.into())
        );
    }

    #[test]
    fn test_distribute_rewards() {
        let mut f = setup();
        let user = f.env.get_account(1);
        deposit(&mut f, user, units(1000));
        f.vault.invest();
        accrue_four_percent(&mut f);
        f.vault.harvest();

        assert_eq!(
            f.vault.try_distribute_rewards(),
            Err(VaultError::RewardDistributorNotSet.into())
        );

        let distributor = RewardDistributor::deploy(
            &f.env,
            RewardDistributorInitArgs {
                reward_token: f.asset.address().clone(),
                notifier: f.vault.address().clone(),
                duration: DAY,
            },
        );
        f.vault.set_reward_distributor(distributor.address().clone());
        assert_eq!(f.vault.reward_distributor(), Some(distributor.address().clone()));

        let skimmed = U256::from(360_000_000_000_000_000u128);
        assert_eq!(f.vault.distribute_rewards(), skimmed);
        assert_eq!(f.vault.total_reward_accrued(), U256::zero());
        assert_eq!(f.asset.balance_of(distributor.address().clone()), skimmed);
        assert_eq!(distributor.total_notified(), skimmed);
        assert_eq!(distributor.reward_rate(), skimmed / U256::from(DAY));
        assert_eq!(f.vault.on_hand_reserve(), units(100));

        assert_eq!(f.vault.try_distribute_rewards(), Err(VaultError::NoRewardsAccrued.into()));
    }

    #[test]
    fn test_admin_operations() {
        let mut f = setup();
        assert_eq!(f.vault.invest_percent(), 90);
        assert_eq!(
            f.vault.try_set_invest_percent(0),
            Err(VaultError::InvalidConfiguration.into())
        );
        assert_eq!(
            f.vault.try_set_invest_percent(100),
            Err(VaultError::InvalidConfiguration.into())
        );
        f.vault.set_invest_percent(50);
        assert_eq!(f.vault.invest_percent(), 50);

        let user = f.env.get_account(1);
        f.env.set_caller(user);
        assert_eq!(f.vault.try_invest(), Err(VaultError::Unauthorized.into()));
        assert_eq!(f.vault.try_harvest(), Err(VaultError::Unauthorized.into()));
        assert_eq!(
            f.vault.try_set_reward_distributor(user),
            Err(VaultError::Unauthorized.into())
        );

        f.env.set_caller(f.env.get_account(0));
        f.vault.transfer_admin(user);
        assert_eq!(f.vault.get_admin(), user);
        assert_eq!(f.vault.try_invest(), Err(VaultError::Unauthorized.into()));
    }

    #[test]
    fn test_share_token_and_previews() {
        let mut f = setup();
        let user = f.env.get_account(1);
        let other = f.env.get_account(2);
        deposit(&mut f, user, units(1000));

        assert_eq!(f.vault.symbol(), "yvSHARE");
        assert_eq!(f.vault.decimals(), 18);
        assert_eq!(f.vault.convert_to_shares(units(500)), units(50));
        assert_eq!(f.vault.convert_to_assets(units(10)), units(100));

        f.env.set_caller(user);
        assert!(f.vault.transfer(other, units(40)));
        assert_eq!(withdraw(&mut f, other, units(40)), units(400));
        assert_eq!(f.vault.balance_of(user), units(60));
    }
}
