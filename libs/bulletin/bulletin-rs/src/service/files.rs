use crate::model::asset::{free_file_name, AssetKind, UploadedAsset};
use crate::model::errors::{BulletinErrKind, BulletinResult};
use crate::model::remote_file::{CommitRequest, Payload, RemoteFile};
use crate::model::validate;
use crate::Bulletin;

const MAX_NAME_ATTEMPTS: usize = 16;

impl Bulletin {
    /// `None` when nothing is stored at `path` yet.
    pub async fn maybe_fetch(&self, path: &str) -> BulletinResult<Option<RemoteFile>> {
        match self.store.fetch(path).await {
            Ok(file) => Ok(Some(file)),
            Err(err) if matches!(err.kind, BulletinErrKind::RemoteFileNotFound(_)) => Ok(None),
            Err(err) => Err(err),
        }
    }

    /// Commits each asset as a new file and returns the generated file names, in order. A name
    /// already present in the repository, or earlier in the batch, moves to a later timestamp.
    /// Stops at the first failure; files committed before it stay in the repository unreferenced.
    #[instrument(level = "debug", skip(self, assets, message), fields(count = assets.len()), err(Debug))]
    pub async fn upload_assets<F>(
        &self, kind: AssetKind, assets: &[UploadedAsset], message: F,
    ) -> BulletinResult<Vec<String>>
    where
        F: Fn(&str) -> String + Send + Sync,
    {
        assets.iter().try_for_each(validate::asset)?;

        let now = (self.get_time)().0;
        let mut names: Vec<String> = Vec::with_capacity(assets.len());
        for asset in assets {
            let (mut stamp, mut name) = free_file_name(kind, now, &asset.name, &names);
            let mut attempts = 1;
            loop {
                let path = self.config.site.asset_path(kind, &name);
                let committed = self
                    .store
                    .commit(CommitRequest {
                        path: path.clone(),
                        payload: Payload::Binary(asset.bytes.clone()),
                        expected: None,
                        message: message(&name),
                    })
                    .await;
                match committed {
                    Ok(version) => {
                        info!(%path, %version, mime = %asset.mime, "asset uploaded");
                        break;
                    }
                    // creating a file that exists conflicts
                    Err(err)
                        if matches!(err.kind, BulletinErrKind::VersionConflict(_))
                            && attempts < MAX_NAME_ATTEMPTS =>
                    {
                        debug!(%path, "asset name taken");
                        (stamp, name) = free_file_name(kind, stamp + 1, &asset.name, &names);
                        attempts += 1;
                    }
                    Err(err) => return Err(err),
                }
            }
            names.push(name);
        }

        Ok(names)
    }
}
