//! Asset persistence
//!
//! One row per asset, keyed by the 32-byte asset id and bincode-encoded.

use std::path::Path;

use lib_types::AssetId;

use crate::errors::LaunchResult;
use crate::types::Asset;

const TREE_ASSETS: &str = "launchpad_assets";

/// Backing store for registry state
pub trait AssetStore: Send + Sync {
    /// Insert or replace an asset
    fn put_asset(&self, asset: &Asset) -> LaunchResult<()>;

    fn get_asset(&self, asset_id: &AssetId) -> LaunchResult<Option<Asset>>;

    /// All stored assets, in key order
    fn load_assets(&self) -> LaunchResult<Vec<Asset>>;

    fn flush(&self) -> LaunchResult<()>;
}

/// Sled-backed asset store
#[derive(Debug, Clone)]
pub struct SledAssetStore {
    db: sled::Db,
    assets: sled::Tree,
}

impl SledAssetStore {
    pub fn open<P: AsRef<Path>>(path: P) -> LaunchResult<Self> {
        let db = sled::open(path)?;
        Self::from_db(db)
    }

    pub fn from_db(db: sled::Db) -> LaunchResult<Self> {
        let assets = db.open_tree(TREE_ASSETS)?;
        Ok(Self { db, assets })
    }

    pub fn asset_count(&self) -> usize {
        self.assets.len()
    }

    pub fn db(&self) -> &sled::Db {
        &self.db
    }
}

impl AssetStore for SledAssetStore {
    fn put_asset(&self, asset: &Asset) -> LaunchResult<()> {
        let encoded = bincode::serialize(asset)?;
        self.assets.insert(asset.asset_id.as_bytes(), encoded)?;
        Ok(())
    }

    fn get_asset(&self, asset_id: &AssetId) -> LaunchResult<Option<Asset>> {
        match self.assets.get(asset_id.as_bytes())? {
            Some(data) => Ok(Some(bincode::deserialize(&data)?)),
            None => Ok(None),
        }
    }

    fn load_assets(&self) -> LaunchResult<Vec<Asset>> {
        let mut assets = Vec::with_capacity(self.assets.len());
        for item in self.assets.iter() {
            let (_, data) = item?;
            assets.push(bincode::deserialize(&data)?);
        }
        Ok(assets)
    }

    fn flush(&self) -> LaunchResult<()> {
        self.assets.flush()?;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use lib_curve::{CurveState, SCALE};
    use lib_types::Address;
    use crate::types::Lifecycle;

    fn sample_asset(tag: u8) -> Asset {
        Asset {
            asset_id: AssetId::new([tag; 32]),
            creator: Address::new([1; 32]),
            name: "Sample".to_string(),
            symbol: "SMPL".to_string(),
            metadata_uri: "ipfs://sample".to_string(),
            created_at: 1_700_000_000,
            total_supply: 1_000_000_000 * SCALE,
            curve: CurveState::initialize(500_000_000 * SCALE, 18 * SCALE).unwrap(),
            lifecycle: Lifecycle::Active,
            launch_fee_paid: SCALE / 100,
            fees_collected: 0,
            trade_count: 0,
            last_sequence: 1,
            graduation: None,
        }
    }

    #[test]
    fn test_put_get_load() {
        let dir = tempfile::tempdir().unwrap();
        let store = SledAssetStore::open(dir.path()).unwrap();

        assert!(store.get_asset(&AssetId::new([1; 32])).unwrap().is_none());

        let first = sample_asset(1);
        let second = sample_asset(2);
        store.put_asset(&first).unwrap();
        store.put_asset(&second).unwrap();
        store.flush().unwrap();

        assert_eq!(store.get_asset(&first.asset_id).unwrap(), Some(first.clone()));
        assert_eq!(store.asset_count(), 2);

        let loaded = store.load_assets().unwrap();
        assert_eq!(loaded, vec![first, second]);
    }

    #[test]
    fn test_put_replaces() {
        let dir = tempfile::tempdir().unwrap();
        let store = SledAssetStore::open(dir.path()).unwrap();

        let mut asset = sample_asset(3);
        store.put_asset(&asset).unwrap();
        asset.trade_count = 9;
        store.put_asset(&asset).unwrap();

        assert_eq!(store.asset_count(), 1);
        assert_eq!(store.get_asset(&asset.asset_id).unwrap().unwrap().trade_count, 9);
    }

    #[test]
    fn test_reopen_preserves_assets() {
        let dir = tempfile::tempdir().unwrap();
        let asset = sample_asset(4);
        {
            let store = SledAssetStore::open(dir.path()).unwrap();
            store.put_asset(&asset).unwrap();
            store.flush().unwrap();
        }
        let store = SledAssetStore::open(dir.path()).unwrap();
        assert_eq!(store.load_assets().unwrap(), vec![asset]);
    }
}
