use crate::permission::{
    LocalizedText, PermissionAction, PermissionCategory, PermissionDefinition, PermissionType,
};

use super::PermissionCatalog;

/// Version label of the catalog compiled into this crate.
pub const BUILTIN_CATALOG_VERSION: &str = "2024.06";

fn text(tr: &str, en: &str) -> LocalizedText {
    LocalizedText::from_pairs([("tr", tr), ("en", en)])
}

fn layout(
    name: &str,
    resource_path: &str,
    permission_type: PermissionType,
    display_name: LocalizedText,
    description: LocalizedText,
) -> PermissionDefinition {
    PermissionDefinition::new(
        name,
        PermissionCategory::Layout,
        resource_path,
        PermissionAction::Access,
        permission_type,
        display_name,
        description,
    )
}

fn view(
    name: &str,
    resource_path: &str,
    permission_type: PermissionType,
    display_name: LocalizedText,
    description: LocalizedText,
) -> PermissionDefinition {
    PermissionDefinition::new(
        name,
        PermissionCategory::View,
        resource_path,
        PermissionAction::View,
        permission_type,
        display_name,
        description,
    )
}

fn function(
    name: &str,
    resource_path: &str,
    action: PermissionAction,
    permission_type: PermissionType,
    display_name: LocalizedText,
    description: LocalizedText,
) -> PermissionDefinition {
    PermissionDefinition::new(
        name,
        PermissionCategory::Function,
        resource_path,
        action,
        permission_type,
        display_name,
        description,
    )
}

/// Panel entry gates.
#[must_use]
pub fn layout_permissions() -> Vec<PermissionDefinition> {
    vec![
        layout(
            "admin.layout",
            "admin",
            PermissionType::Admin,
            text("Yönetim paneli", "Admin panel"),
            text(
                "Yönetim paneline giriş yapabilir",
                "Can enter the admin panel",
            ),
        )
        .with_used_in(["AdminLayout", "middleware"]),
        layout(
            "user.layout",
            "account",
            PermissionType::User,
            text("Müşteri paneli", "Customer panel"),
            text(
                "Müşteri paneline giriş yapabilir",
                "Can enter the customer panel",
            ),
        )
        .with_used_in(["UserLayout", "middleware"]),
    ]
}

/// Page read gates.
#[must_use]
pub fn view_permissions() -> Vec<PermissionDefinition> {
    vec![
        view(
            "admin.dashboard.view",
            "dashboard",
            PermissionType::Admin,
            text("Kontrol paneli", "Dashboard"),
            text(
                "Yönetim kontrol panelini görüntüleyebilir",
                "Can open the admin dashboard",
            ),
        )
        .with_dependencies(["admin.layout"])
        .with_used_in(["/admin"]),
        view(
            "admin.users.view",
            "users",
            PermissionType::Admin,
            text("Kullanıcılar", "Users"),
            text(
                "Kullanıcı listesini görüntüleyebilir",
                "Can open the user list",
            ),
        )
        .with_dependencies(["admin.layout"])
        .with_used_in(["/admin/users", "GET /api/admin/users"]),
        view(
            "admin.roles.view",
            "roles",
            PermissionType::Admin,
            text("Roller", "Roles"),
            text("Rol listesini görüntüleyebilir", "Can open the role list"),
        )
        .with_dependencies(["admin.layout"])
        .with_used_in(["/admin/roles", "GET /api/admin/roles"]),
        view(
            "admin.permissions.view",
            "permissions",
            PermissionType::Admin,
            text("Yetkiler", "Permissions"),
            text(
                "Yetki kataloğunu görüntüleyebilir",
                "Can open the permission catalog",
            ),
        )
        .with_dependencies(["admin.layout"])
        .with_used_in(["/admin/permissions"]),
        view(
            "admin.tickets.view",
            "tickets",
            PermissionType::Admin,
            text("Destek talepleri", "Support tickets"),
            text(
                "Tüm destek taleplerini görüntüleyebilir",
                "Can open every support ticket",
            ),
        )
        .with_dependencies(["admin.layout"])
        .with_used_in(["/admin/tickets", "GET /api/admin/tickets"]),
        view(
            "user.dashboard.view",
            "dashboard",
            PermissionType::User,
            text("Hesabım", "My account"),
            text(
                "Müşteri kontrol panelini görüntüleyebilir",
                "Can open the customer dashboard",
            ),
        )
        .with_dependencies(["user.layout"])
        .with_used_in(["/account"]),
        view(
            "user.tickets.view",
            "tickets",
            PermissionType::User,
            text("Taleplerim", "My tickets"),
            text(
                "Kendi destek taleplerini görüntüleyebilir",
                "Can open own support tickets",
            ),
        )
        .with_dependencies(["user.layout"])
        .with_used_in(["/account/tickets"]),
    ]
}

/// Mutating and fine-grained operations.
#[must_use]
pub fn function_permissions() -> Vec<PermissionDefinition> {
    vec![
        function(
            "users.create",
            "users",
            PermissionAction::Create,
            PermissionType::Admin,
            text("Kullanıcı oluştur", "Create users"),
            text("Yeni kullanıcı ekleyebilir", "Can add new users"),
        )
        .with_dependencies(["admin.users.view"])
        .with_used_in(["POST /api/admin/users"])
        .with_dev_notes("Checked by the user creation dialog and its API route."),
        function(
            "users.update",
            "users",
            PermissionAction::Update,
            PermissionType::Admin,
            text("Kullanıcı düzenle", "Edit users"),
            text(
                "Kullanıcı bilgilerini düzenleyebilir",
                "Can edit user details",
            ),
        )
        .with_dependencies(["admin.users.view"])
        .with_used_in(["PATCH /api/admin/users/:id"])
        .with_dev_notes("Also gates role assignment on the user detail page."),
        function(
            "users.delete",
            "users",
            PermissionAction::Delete,
            PermissionType::Admin,
            text("Kullanıcı sil", "Delete users"),
            text("Kullanıcıları silebilir", "Can delete users"),
        )
        .with_dependencies(["admin.users.view"])
        .with_used_in(["DELETE /api/admin/users/:id"])
        .with_dev_notes("Soft delete; the account row is kept for audit."),
        function(
            "roles.create",
            "roles",
            PermissionAction::Create,
            PermissionType::Admin,
            text("Rol oluştur", "Create roles"),
            text("Yeni rol tanımlayabilir", "Can define new roles"),
        )
        .with_dependencies(["admin.roles.view"])
        .with_used_in(["POST /api/admin/roles"])
        .with_dev_notes("New roles start with no grants."),
        function(
            "roles.update",
            "roles",
            PermissionAction::Update,
            PermissionType::Admin,
            text("Rol düzenle", "Edit roles"),
            text(
                "Rol adını ve rengini düzenleyebilir",
                "Can edit role name and color",
            ),
        )
        .with_dependencies(["admin.roles.view"])
        .with_used_in(["PATCH /api/admin/roles/:name"])
        .with_dev_notes("System default roles stay read-only."),
        function(
            "roles.delete",
            "roles",
            PermissionAction::Delete,
            PermissionType::Admin,
            text("Rol sil", "Delete roles"),
            text("Özel rolleri silebilir", "Can delete custom roles"),
        )
        .with_dependencies(["admin.roles.view"])
        .with_used_in(["DELETE /api/admin/roles/:name"])
        .with_dev_notes("System default roles are rejected by the assignment store."),
        function(
            "roles.permissions.manage",
            "roles",
            PermissionAction::Manage,
            PermissionType::Admin,
            text("Rol yetkilerini yönet", "Manage role permissions"),
            text(
                "Rollere yetki verebilir ve geri alabilir",
                "Can grant and revoke role permissions",
            ),
        )
        .with_dependencies(["admin.roles.view", "admin.permissions.view"])
        .with_used_in(["PUT /api/admin/roles/:name/permissions"])
        .with_dev_notes("Grant normalization adds the layout permission automatically."),
        function(
            "tickets.update",
            "tickets",
            PermissionAction::Update,
            PermissionType::Admin,
            text("Talep güncelle", "Update tickets"),
            text(
                "Destek taleplerini yanıtlayabilir ve durumunu değiştirebilir",
                "Can answer tickets and change their status",
            ),
        )
        .with_dependencies(["admin.tickets.view"])
        .with_used_in(["PATCH /api/admin/tickets/:id"])
        .with_dev_notes("Status transitions are validated by the ticket service."),
        function(
            "tickets.delete",
            "tickets",
            PermissionAction::Delete,
            PermissionType::Admin,
            text("Talep sil", "Delete tickets"),
            text("Destek taleplerini silebilir", "Can delete tickets"),
        )
        .with_dependencies(["admin.tickets.view"])
        .with_used_in(["DELETE /api/admin/tickets/:id"])
        .with_dev_notes("Attachments are removed together with the ticket."),
        function(
            "user.tickets.create",
            "tickets",
            PermissionAction::Create,
            PermissionType::User,
            text("Talep oluştur", "Open tickets"),
            text(
                "Yeni destek talebi açabilir",
                "Can open a new support ticket",
            ),
        )
        .with_dependencies(["user.tickets.view"])
        .with_used_in(["POST /api/tickets"])
        .with_dev_notes("Rate limited per customer."),
        function(
            "user.profile.update",
            "profile",
            PermissionAction::Update,
            PermissionType::User,
            text("Profil düzenle", "Edit profile"),
            text(
                "Kendi profil bilgilerini düzenleyebilir",
                "Can edit own profile details",
            ),
        )
        .with_dependencies(["user.dashboard.view"])
        .with_used_in(["PATCH /api/profile"])
        .with_dev_notes("Email changes require re-verification."),
    ]
}

/// Returns the catalog compiled into this crate: layout, view and function groups in order.
#[must_use]
pub fn builtin_catalog() -> PermissionCatalog {
    let mut definitions = layout_permissions();
    definitions.extend(view_permissions());
    definitions.extend(function_permissions());

    PermissionCatalog::new(BUILTIN_CATALOG_VERSION, definitions)
}
