/// オンボーディングのステップ（実行順）
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum OnboardStep {
    /// 要求の事前検証
    Validate,
    /// ワークスペースと空リポジトリの作成
    WorkspaceInit,
    /// テンプレートの展開
    Materialize,
    /// 展開したファイルの初回コミット
    Commit,
    /// リモートリポジトリの作成、リモート設定、プッシュ
    RemoteProvision,
    /// ステージ変数とテナント変数
    PublishStages,
}

impl OnboardStep {
    pub fn name(&self) -> &'static str {
        match self {
            Self::Validate => "validate request",
            Self::WorkspaceInit => "initialize workspace",
            Self::Materialize => "render template",
            Self::Commit => "initial commit",
            Self::RemoteProvision => "provision remote repository",
            Self::PublishStages => "publish stage configuration",
        }
    }

    pub fn id(&self) -> &'static str {
        match self {
            Self::Validate => "validate",
            Self::WorkspaceInit => "workspace",
            Self::Materialize => "template",
            Self::Commit => "commit",
            Self::RemoteProvision => "remote",
            Self::PublishStages => "publish",
        }
    }

    /// 実行されるステップ一覧（テンプレートの有無で変わる）
    pub fn plan(with_template: bool) -> Vec<Self> {
        let mut steps = vec![Self::Validate, Self::WorkspaceInit];
        if with_template {
            steps.extend([Self::Materialize, Self::Commit]);
        }
        steps.extend([Self::RemoteProvision, Self::PublishStages]);
        steps
    }
}

impl std::fmt::Display for OnboardStep {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.name())
    }
}
