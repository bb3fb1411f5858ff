//! GraphQL document catalog.
//!
//! Static query/mutation documents, one per platform operation. Connection
//! fields follow the platform's relay-style `edges { node { .. } }` shape,
//! and every mutable entity exposes its concurrency token as `_etag`.

pub const GET_USERS: &str = r#"
    query GetUsers($filters: UserInputFilters) {
        users(filters: $filters) {
            edges {
                node {
                    id
                    name
                    email
                }
            }
        }
    }
"#;

pub const GET_TEAMS: &str = r#"
    query GetTeams($filters: TeamsInputFilters) {
        teams(filters: $filters) {
            edges {
                node {
                    id
                    name
                }
            }
        }
    }
"#;

pub const ADD_USER_TO_TEAM: &str = r#"
    mutation AddUserToTeam($input: TeamToUserInput!) {
        addUserToTeam(input: $input) {
            teamId
            userId
        }
    }
"#;

pub const GET_ROLES: &str = r#"
    query GetRoles($filters: RolesInputFilters) {
        roles(filters: $filters) {
            edges {
                node {
                    id
                    name
                }
            }
        }
    }
"#;

pub const CREATE_ROLE: &str = r#"
    mutation CreateRole($input: CreateRoleInput!) {
        createRole(input: $input) {
            role {
                id
                name
            }
        }
    }
"#;

pub const GET_PERMISSION_GROUPS: &str = r#"
    query GetPermissionGroups($filters: PermissionGroupsInputFilters) {
        permissionGroups(filters: $filters) {
            edges {
                node {
                    id
                    name
                    family
                }
            }
        }
    }
"#;

pub const ATTACH_PERMISSION_GROUP_TO_ROLE: &str = r#"
    mutation AttachPermissionGroupToRole($input: PermissionGroupToRoleInput!) {
        attachPermissionGroupToRole(input: $input) {
            role {
                id
                name
            }
        }
    }
"#;

pub const CREATE_MBOM_ITEM_REFERENCE_DESIGNATOR: &str = r#"
    mutation CreateMbomItemReferenceDesignator($input: CreateMBomItemReferenceDesignatorInput!) {
        createMbomItemReferenceDesignator(input: $input) {
            mbomItemReferenceDesignator {
                _etag
                id
                mbomItemId
                value
            }
        }
    }
"#;

pub const CREATE_OR_UPDATE_MBOMS: &str = r#"
    mutation CreateOrUpdateMultipleMboms($input: CreateOrUpdateMultipleMbomsInput!) {
        createOrUpdateMultipleMboms(input: $input) {
            newMbomRowIds
            errorMessages {
                rowId
                errorMsg
            }
        }
    }
"#;

pub const GET_PART_INVENTORY: &str = r#"
    query PartInventory($id: ID!) {
        partInventory(id: $id) {
            _etag
            id
            quantity
            status
            part {
                description
                partNumber
                revision
            }
        }
    }
"#;

pub const UPDATE_PART_INVENTORY: &str = r#"
    mutation UpdatePartInventory($input: UpdatePartInventoryInput!) {
        updatePartInventory(input: $input) {
            partInventory {
                _etag
                id
                quantity
            }
        }
    }
"#;

pub const GET_INVENTORIES_WITH_ABOM: &str = r#"
    query GetInventories($after: String) {
        partInventories(first: 50, after: $after) {
            edges {
                node {
                    part {
                        partNumber
                        description
                    }
                    serialNumber
                    lotNumber
                    buildRequirements {
                        abomInstallations {
                            quantity
                            partInventory {
                                part {
                                    partNumber
                                    description
                                }
                                serialNumber
                                lotNumber
                            }
                        }
                    }
                }
            }
            pageInfo {
                endCursor
                hasNextPage
            }
        }
    }
"#;

pub const GET_INVENTORIES_AT_LOCATION: &str = r#"
    query PartInventoriesAtLocation($filters: PartInventoriesInputFilters) {
        partInventories(filters: $filters) {
            edges {
                node {
                    id
                    quantity
                    quantityAvailable
                    part {
                        partId
                        partNumber
                    }
                }
            }
        }
    }
"#;

pub const GET_PURCHASE_ORDER_ETAG: &str = r#"
    query PurchaseOrder($id: ID!) {
        purchaseOrder(id: $id) {
            id
            _etag
        }
    }
"#;

pub const UPDATE_PURCHASE: &str = r#"
    mutation UpdatePurchaseOrder($input: UpdatePurchaseOrderInput!) {
        updatePurchaseOrder(input: $input) {
            purchaseOrder {
                id
                _etag
                status
            }
        }
    }
"#;

pub const GET_PURCHASES: &str = r#"
    query PurchaseOrders($filters: PurchaseOrdersInputFilters) {
        purchaseOrders(filters: $filters) {
            edges {
                node {
                    id
                    _etag
                    status
                    approvals {
                        id
                    }
                    approvalRequests {
                        id
                    }
                    fees {
                        id
                    }
                }
            }
        }
    }
"#;

pub const GET_PURCHASE_LINES: &str = r#"
    query PurchaseOrderLines($filters: PurchaseOrderLinesInputFilters) {
        purchaseOrderLines(filters: $filters) {
            edges {
                node {
                    id
                    _etag
                    purchaseOrder {
                        id
                        _etag
                        status
                    }
                    partInventories {
                        installed
                        kitted
                        received
                        abomChildren {
                            partInventoryId
                        }
                    }
                }
            }
        }
    }
"#;

pub const GET_PURCHASE_LINE_ETAG: &str = r#"
    query PurchaseOrderLine($id: ID!) {
        purchaseOrderLine(id: $id) {
            id
            _etag
        }
    }
"#;

pub const DELETE_PURCHASE: &str = r#"
    mutation DeletePurchaseOrder($id: ID!, $etag: String!) {
        deletePurchaseOrder(id: $id, etag: $etag) {
            id
        }
    }
"#;

pub const DELETE_PURCHASE_LINE: &str = r#"
    mutation DeletePurchaseOrderLine($id: ID!, $etag: String!) {
        deletePurchaseOrderLine(id: $id, etag: $etag) {
            id
        }
    }
"#;

pub const CREATE_ISSUE: &str = r#"
    mutation CreateIssue($input: CreateIssueInput!) {
        createIssue(input: $input) {
            issue {
                id
                causeCondition
            }
        }
    }
"#;

pub const UPDATE_ISSUE_ATTRIBUTE: &str = r#"
    mutation UpdateIssueAttribute($input: UpdateIssueAttributeInput!) {
        updateIssueAttribute(input: $input) {
            issueAttribute {
                _etag
                key
                value
            }
        }
    }
"#;

pub const GET_ISSUE_ATTRIBUTES: &str = r#"
    query GetIssues($filters: IssuesInputFilters) {
        issues(filters: $filters) {
            edges {
                node {
                    id
                    attributes {
                        _etag
                        key
                        value
                    }
                }
            }
        }
    }
"#;

pub const GET_LOCATIONS: &str = r#"
    query Locations($filters: LocationsInputFilters) {
        locations(filters: $filters) {
            edges {
                node {
                    id
                    _etag
                }
            }
        }
    }
"#;

pub const DELETE_LOCATION: &str = r#"
    mutation DeleteLocation($id: ID!, $etag: String!) {
        deleteLocation(id: $id, etag: $etag) {
            id
        }
    }
"#;

pub const GET_LABELS: &str = r#"
    query GetLabels($filters: LabelsInputFilters) {
        labels(filters: $filters) {
            edges {
                node {
                    id
                    _etag
                    value
                }
            }
        }
    }
"#;

pub const CREATE_LABEL: &str = r#"
    mutation CreateLabel($input: CreateLabelInput!) {
        createLabel(input: $input) {
            label {
                id
                value
                _etag
            }
        }
    }
"#;

pub const GET_RUN_STEPS: &str = r#"
    query RunSteps($id: ID!) {
        run(id: $id) {
            id
            steps {
                id
                position
                entityId
            }
        }
    }
"#;

pub const GET_RUN_LABELS: &str = r#"
    query GetRun($id: ID!) {
        run(id: $id) {
            id
            entityId
            _etag
            labels {
                id
                value
            }
        }
    }
"#;

pub const ADD_LABEL_TO_ENTITY: &str = r#"
    mutation AddLabelToItem($input: LabelToItemInput!) {
        addLabelToItem(input: $input) {
            labelId
            entityId
        }
    }
"#;

pub const REMOVE_LABEL_FROM_ENTITY: &str = r#"
    mutation RemoveLabelFromItem($input: LabelToItemInput!) {
        removeLabelFromItem(input: $input) {
            labelId
            entityId
        }
    }
"#;

pub const ADD_LABEL_TO_PROCEDURE_FAMILY: &str = r#"
    mutation AddLabelToProcedureFamily($input: LabelToProcedureFamilyInput!) {
        addLabelToProcedureFamily(input: $input) {
            labelId
            familyId
        }
    }
"#;

pub const CREATE_RULE: &str = r#"
    mutation CreateRule($input: CreateRuleInput!) {
        createRule(input: $input) {
            rule {
                id
                title
                enabled
            }
        }
    }
"#;

pub const GET_PROCEDURE: &str = r#"
    query GetProcedure($id: ID!) {
        procedure(id: $id) {
            id
            title
            description
            familyId
            labels
            type
            attributes {
                key
                type
                value
            }
            steps {
                id
                entityId
                title
                type
                slateContent
                leadTime
                locationId
                locationSubtypeId
                parentId
                position
                isDerivedStep
                originStepId
                upstreamStepIds
                fields {
                    id
                    allowNotApplicable
                    name
                    options
                    required
                    type
                    unit
                    validations {
                        functionId
                        fieldId
                    }
                }
                datagridColumns {
                    edges {
                        node {
                            id
                            index
                            header
                            options
                            type
                        }
                    }
                }
                datagridRows {
                    edges {
                        node {
                            id
                            allowNotApplicable
                            index
                            required
                            values {
                                value
                                columnId
                                type
                            }
                        }
                    }
                }
                steps {
                    id
                    entityId
                    title
                    type
                    slateContent
                    leadTime
                    locationId
                    locationSubtypeId
                    parentId
                    position
                    isDerivedStep
                    originStepId
                    upstreamStepIds
                    fields {
                        id
                        allowNotApplicable
                        name
                        options
                        required
                        type
                        unit
                        validations {
                            functionId
                            fieldId
                        }
                    }
                    datagridColumns {
                        edges {
                            node {
                                id
                                index
                                header
                                options
                                type
                            }
                        }
                    }
                    datagridRows {
                        edges {
                            node {
                                id
                                allowNotApplicable
                                index
                                required
                                values {
                                    value
                                    columnId
                                    type
                                }
                            }
                        }
                    }
                }
            }
        }
    }
"#;

pub const CREATE_PROCEDURE: &str = r#"
    mutation CreateProcedure(
        $title: String!,
        $description: String,
        $type: Proceduretypeenum
    ) {
        createProcedure(
            title: $title,
            description: $description,
            type: $type
        ) {
            procedure {
                id
                familyId
            }
        }
    }
"#;

pub const CREATE_STEP: &str = r#"
    mutation CreateStep($input: CreateStepInput!) {
        createStep(input: $input) {
            step {
                id
                _etag
                entityId
                familyId
                position
                procedureId
                slateContent
                title
                type
            }
        }
    }
"#;

pub const UPDATE_STEP: &str = r#"
    mutation UpdateStep($input: UpdateStepInput!) {
        updateStep(input: $input) {
            step {
                id
                _etag
                slateContent
                title
            }
        }
    }
"#;

pub const CREATE_STEP_FIELD: &str = r#"
    mutation CreateStepField($input: CreateStepFieldInput!) {
        createStepField(input: $input) {
            stepField {
                _etag
                id
                name
                stepId
                type
                unit
            }
        }
    }
"#;

pub const CREATE_DATAGRID_COLUMN: &str = r#"
    mutation CreateDatagridColumn($input: CreateDatagridColumnInput!) {
        createDatagridColumn(input: $input) {
            datagridColumn {
                id
                index
                header
                options
                stepId
                type
            }
        }
    }
"#;

pub const CREATE_DATAGRID_ROW: &str = r#"
    mutation CreateDatagridRow($input: CreateDatagridRowInput!) {
        createDatagridRow(input: $input) {
            datagridRow {
                id
                index
                required
                stepId
            }
        }
    }
"#;

pub const SET_DATAGRID_VALUE: &str = r#"
    mutation SetDatagridValue($input: SetDatagridValueInput!) {
        setDatagridValue(input: $input) {
            datagridValue {
                _etag
                columnId
                id
                rowId
                type
                value
            }
        }
    }
"#;

pub const CREATE_STEP_EDGE: &str = r#"
    mutation CreateStepEdge($stepId: ID!, $upstreamStepId: ID!) {
        createStepEdge(input: {stepId: $stepId, upstreamStepId: $upstreamStepId}) {
            stepEdge {
                id
                stepId
                upstreamStepId
            }
        }
    }
"#;

pub const GET_STEPS_BY_TITLE: &str = r#"
    query GetSteps($filters: StepsFilters) {
        steps(filters: $filters) {
            edges {
                node {
                    id
                    title
                    isStandardStep
                }
            }
        }
    }
"#;

pub const GET_STEP: &str = r#"
    query Step($id: ID!) {
        step(id: $id) {
            id
            entityId
            title
            type
            slateContent
            leadTime
            locationId
            locationSubtypeId
            parentId
            position
            isDerivedStep
            originStepId
            upstreamStepIds
            fields {
                id
                allowNotApplicable
                name
                options
                required
                type
                unit
                validations {
                    functionId
                    fieldId
                }
            }
            datagridColumns {
                edges {
                    node {
                        id
                        index
                        header
                        options
                        type
                    }
                }
            }
            datagridRows {
                edges {
                    node {
                        id
                        allowNotApplicable
                        index
                        required
                        values {
                            value
                            columnId
                            type
                        }
                    }
                }
            }
            steps {
                id
                entityId
                title
                type
                slateContent
                leadTime
                locationId
                locationSubtypeId
                parentId
                position
                isDerivedStep
                originStepId
                upstreamStepIds
                fields {
                    id
                    allowNotApplicable
                    name
                    options
                    required
                    type
                    unit
                    validations {
                        functionId
                        fieldId
                    }
                }
            }
        }
    }
"#;

pub const COPY_STEP: &str = r#"
    mutation CopyStep($input: CopyStepInput!) {
        copyStep(input: $input) {
            step {
                id
                _etag
                procedureId
                title
            }
        }
    }
"#;

pub const GET_FILE_ATTACHMENT: &str = r#"
    query FileAttachment($id: ID!) {
        fileAttachment(id: $id) {
            id
            filename
            contentType
            downloadUrl
        }
    }
"#;

pub const CREATE_FILE_ATTACHMENT: &str = r#"
    mutation CreateFileAttachment($input: CreateFileAttachmentInput!) {
        createFileAttachment(input: $input) {
            fileAttachment {
                id
                entityId
                filename
                contentType
            }
            uploadUrl
        }
    }
"#;

pub const CREATE_ASSET: &str = r#"
    mutation CreateAsset($input: CreateFileAttachmentInput!) {
        createAsset(input: $input) {
            fileAttachment {
                id
                entityId
                filename
                contentType
            }
            uploadUrl
        }
    }
"#;
